//! Installer setup builder library.
//!
//! Builds installable artifacts from a declarative setup description:
//! - macOS application bundles (`.app`) and disk images (`.dmg`)
//! - Windows installer packages (`.msi`, one per language)
//!
//! Applications inherit unset values from the setup, translation files
//! are turned into cached WiX localization documents, and every
//! application is assembled through a strictly ordered stage pipeline.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
