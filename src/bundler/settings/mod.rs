//! Configuration structures for bundling operations.
//!
//! The settings form a two-level hierarchy: a [`SetupDescription`] with
//! setup-wide defaults and [`ApplicationDescription`]s that fall back to it
//! field by field. Target settings and builders complete the picture.

mod application;
mod arch;
mod builder;
mod core;
mod document;
mod macos;
mod setup;
mod windows;

// Re-export all public types
pub use application::{ApplicationDescription, ResolvedApplication};
pub use arch::Arch;
pub use builder::{SettingsBuilder, SetupBuilder};
pub use core::Settings;
pub use document::{DocumentRole, DocumentType};
pub use macos::{DmgSettings, MacOsSettings};
pub use setup::SetupDescription;
pub use windows::MsiSettings;
