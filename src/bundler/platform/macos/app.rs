//! macOS application bundle (.app) creation.
//!
//! Each application of the setup becomes one bundle:
//!
//! ```text
//! <DisplayName>.app/
//! └── Contents/
//!     ├── Info.plist
//!     ├── MacOS/<executable>
//!     └── Resources/
//!         ├── <executable>.icns
//!         └── app/            main archive and resources
//! ```

use crate::bundler::{
    builder::BundleSigner,
    error::Result,
    pipeline::{self, AssembledBundle, PlatformContext},
    platform::PackageType,
    resources::ImageFactory,
    settings::Settings,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Bundles every application into `destination_dir`.
///
/// Sibling applications are still assembled when one of them fails; the
/// failures are then reported together.
///
/// # Returns
///
/// One bundle directory per application, in declaration order.
pub async fn bundle_project(
    settings: &Settings,
    factory: &dyn ImageFactory,
    signer: Option<&dyn BundleSigner>,
) -> Result<Vec<PathBuf>> {
    let bundles = assemble_into(
        settings,
        PackageType::AppBundle,
        settings.destination_dir(),
        factory,
        signer,
    )
    .await?;

    Ok(bundles.into_iter().map(|bundle| bundle.path).collect())
}

/// Runs the pipeline for every application, writing bundles to `output_dir`.
pub(crate) async fn assemble_into(
    settings: &Settings,
    package_type: PackageType,
    output_dir: &Path,
    factory: &dyn ImageFactory,
    signer: Option<&dyn BundleSigner>,
) -> Result<Vec<AssembledBundle>> {
    log::info!(
        "Bundling {} application(s) of {}",
        settings.applications().len(),
        settings.setup().application()
    );

    fs::create_dir_all(output_dir, false).await?;

    let ctx = PlatformContext::macos_app(package_type, output_dir, settings.setup(), settings.macos());
    let outcomes = pipeline::assemble_applications(
        &ctx,
        settings.setup(),
        settings.applications(),
        factory,
        signer,
    )
    .await?;

    pipeline::into_bundles(outcomes)
}
