//! Assembly of the disk image contents.

use crate::bundler::{
    builder::BundleSigner,
    error::{Context, Error, Result},
    i18n::LocalizedResource,
    pipeline::AssembledBundle,
    platform::{PackageType, macos::app},
    resources::ImageFactory,
    settings::{Settings, SetupDescription},
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Fills `staging_dir` with everything that goes onto the image.
///
/// The directory is erased first. Returns the staged application bundles.
pub async fn stage_contents(
    settings: &Settings,
    staging_dir: &Path,
    factory: &dyn ImageFactory,
    signer: Option<&dyn BundleSigner>,
) -> Result<Vec<AssembledBundle>> {
    fs::create_dir_all(staging_dir, true).await?;

    let bundles =
        app::assemble_into(settings, PackageType::Dmg, staging_dir, factory, signer).await?;

    let applications_link = staging_dir.join("Applications");
    fs::symlink(Path::new("/Applications"), &applications_link).await?;

    let setup = settings.setup();
    let dmg = settings.dmg();

    if let Some(background) = &dmg.background {
        let source = setup.resolve_path(background);
        let name = source.file_name().ok_or_else(|| {
            Error::InvalidConfiguration(format!("invalid background image {}", source.display()))
        })?;
        let target = staging_dir.join(".background").join(name);
        fs::copy_file(&source, &target)
            .await
            .context("copying disk image background")?;
        log::debug!("Copied background image to {}", target.display());
    }

    stage_pages(setup, staging_dir, "Welcome", &dmg.welcome_pages).await?;
    stage_pages(setup, staging_dir, "Conclusion", &dmg.conclusion_pages).await?;

    Ok(bundles)
}

async fn stage_pages(
    setup: &SetupDescription,
    staging_dir: &Path,
    kind: &str,
    pages: &[LocalizedResource],
) -> Result<()> {
    for page in pages {
        let Some(source) = page.source_file(setup) else {
            continue;
        };
        let target = page_target(staging_dir, kind, page.locale.language_id, &source);
        fs::copy_file(&source, &target)
            .await
            .with_context(|| format!("copying {} page for {}", kind, page.locale))?;
        log::debug!("Staged {} page {}", kind, target.display());
    }
    Ok(())
}

/// Location of a localized page inside the image.
///
/// The page keeps the extension of its source file.
pub fn page_target(staging_dir: &Path, kind: &str, language: &str, source: &Path) -> PathBuf {
    let file_name = match source.extension() {
        Some(ext) => format!("{}.{}", kind, ext.to_string_lossy()),
        None => kind.to_string(),
    };
    staging_dir
        .join(".resources")
        .join(format!("{language}.lproj"))
        .join(file_name)
}
