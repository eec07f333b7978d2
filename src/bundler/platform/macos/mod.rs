//! macOS targets: application bundles and disk images.
//!
//! - `app` - `.app` bundles assembled by the staged pipeline
//! - `dmg` - drag-to-install disk images built with `hdiutil`

pub mod app;
pub mod dmg;
