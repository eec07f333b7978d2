//! Resource handling for bundles.
//!
//! - `icons` - icon sets and conversion into ICNS, ICO and PNG

pub mod icons;

pub use icons::{IconConverter, IconKind, IconSet, ImageFactory};
