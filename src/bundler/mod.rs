//! Setup bundling library.
//!
//! Turns a [`SetupDescription`] and its [`ApplicationDescription`]s into
//! installable artifacts:
//!
//! - macOS application bundles (`.app`)
//! - macOS disk images (`.dmg`)
//! - Windows installers (`.msi`, one per language)
//!
//! Application values fall back to the setup when unset, string tables are
//! converted into cached localization documents, and every application is
//! assembled through the staged [`pipeline`].
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_setup::bundler::{Bundler, PackageType, SettingsBuilder, SetupBuilder};
//!
//! # async fn example() -> kodegen_bundler_setup::bundler::Result<()> {
//! let setup = SetupBuilder::new()
//!     .application("Demo")
//!     .project_dir("/work/demo")
//!     .binaries_dir("target/release")
//!     .build()?;
//! let settings = SettingsBuilder::new().setup(setup).build()?;
//!
//! for artifact in Bundler::new(settings).bundle_types(&[PackageType::AppBundle]).await? {
//!     println!("{} {}", artifact.package_type, artifact.checksum);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod i18n;
pub mod pipeline;
pub mod platform;
pub mod resources;
pub mod settings;
pub mod utils;

pub use builder::{BundleSigner, Bundler, CodesignSigner};
pub use error::{Error, Result};
pub use platform::PackageType;
pub use settings::{
    ApplicationDescription, Arch, DmgSettings, DocumentRole, DocumentType, MacOsSettings,
    MsiSettings, ResolvedApplication, Settings, SettingsBuilder, SetupBuilder, SetupDescription,
};

use serde::Serialize;
use std::path::PathBuf;

/// A finished artifact of one package type.
#[derive(Clone, Debug, Serialize)]
pub struct BundledArtifact {
    /// The package type that was built.
    pub package_type: PackageType,
    /// Every file or bundle directory produced for the type.
    pub paths: Vec<PathBuf>,
    /// Total size in bytes.
    pub size: u64,
    /// Hex SHA-256 of the first path.
    pub checksum: String,
}
