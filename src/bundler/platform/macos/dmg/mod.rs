//! macOS DMG disk image creator.
//!
//! Creates drag-to-install disk images with the native `hdiutil` tool.
//!
//! # Module Organization
//!
//! - `staging` - assembles the image contents (bundles, links, pages)
//! - `creation` - `hdiutil` create, attach, detach and convert
//! - `customization` - Finder window layout through AppleScript
//!
//! # Image Layout
//!
//! ```text
//! <volume>/
//! ├── <DisplayName>.app            one per application
//! ├── Applications -> /Applications
//! ├── .background/<image>
//! └── .resources/<lang>.lproj/{Welcome,Conclusion}.<ext>
//! ```

mod creation;
mod customization;
mod staging;

pub use customization::{FinderLayout, escape_applescript_string};
pub use staging::{page_target, stage_contents};

use crate::bundler::{
    builder::BundleSigner,
    error::{Context, Result},
    resources::ImageFactory,
    settings::Settings,
    utils::fs,
};
use std::path::PathBuf;

/// Bundles every application into one disk image.
///
/// # Process
///
/// 1. Assemble the applications into `<build_dir>/dmg/staging`
/// 2. Add the Applications link, background and localized pages
/// 3. Create a writable image and apply the Finder layout
/// 4. Convert the image to compressed UDZO
/// 5. Sign the image if a signer is configured
///
/// # Returns
///
/// Vector containing the path of the created image.
pub async fn bundle_project(
    settings: &Settings,
    factory: &dyn ImageFactory,
    signer: Option<&dyn BundleSigner>,
) -> Result<Vec<PathBuf>> {
    let setup = settings.setup();
    let volume_name = settings
        .dmg()
        .volume_name
        .clone()
        .unwrap_or_else(|| setup.application().to_string());

    log::info!("Creating DMG '{}'", volume_name);

    let work_dir = setup.build_dir().join("dmg");
    let staging_dir = work_dir.join("staging");
    let bundles = stage_contents(settings, &staging_dir, factory, signer).await?;

    let output_dir = settings.destination_dir();
    fs::create_dir_all(output_dir, false).await?;
    let dmg_path = output_dir.join(format!("{}-{}.dmg", setup.application(), setup.version()));
    let writable = work_dir.join("writable.dmg");

    creation::create_image(&staging_dir, &volume_name, &writable, "UDRW").await?;

    let layout = FinderLayout::new(&volume_name, settings.dmg(), &bundles);
    customization::apply_layout(&writable, &layout).await?;

    creation::convert_to_compressed(&writable, &dmg_path).await?;

    if let Some(signer) = signer {
        signer
            .sign_application(&dmg_path)
            .await
            .context("signing disk image")?;
    }

    log::info!("✓ Created DMG: {}", dmg_path.display());
    Ok(vec![dmg_path])
}
