//! Windows Installer (.msi) creation with the WiX toolset.
//!
//! # Module Organization
//!
//! - `template` - WiX source template
//! - `script` - template data, product codes and version normalization
//! - `localization` - installer languages, string tables and licenses
//! - `build` - `candle` and `light` execution
//!
//! One package is linked per language. Each language gets the
//! localization document materialized from its string table, so the
//! installer UI strings can be overridden per culture.

mod build;
mod localization;
mod script;
mod template;

pub use build::light_args;
pub use localization::{LanguagePlan, languages, plan};
pub use script::{ProductCodes, WxsDocument, executable_file_name, product_version};

use crate::bundler::{
    error::{Context, Result},
    i18n::LocalizationCache,
    resources::{IconKind, ImageFactory},
    settings::Settings,
    utils::fs,
};
use std::path::PathBuf;

/// Bundles the setup as one MSI package per installer language.
///
/// # Process
///
/// 1. Resolve the installer languages and their localization documents
/// 2. Convert the application icon to ICO
/// 3. Per language: render the WiX source, run `candle` and `light`
///
/// # Returns
///
/// The packages in language order.
pub async fn bundle_project(
    settings: &Settings,
    cache: &LocalizationCache,
    factory: &dyn ImageFactory,
) -> Result<Vec<PathBuf>> {
    let setup = settings.setup();
    let msi = settings.msi();
    log::info!(
        "Building MSI installer for {} ({})",
        setup.application(),
        msi.arch.wix_platform()
    );

    let plans = plan(settings, cache)?;
    let codes = ProductCodes::derive(setup, msi)?;

    let work_dir = setup.build_dir().join("msi");
    fs::create_dir_all(&work_dir, false).await?;

    let icon = match settings.applications().first() {
        Some(app) => app.icon_for_type(setup, &work_dir.join("icon"), IconKind::Ico, factory)?,
        None => None,
    };

    fs::create_dir_all(settings.destination_dir(), false).await?;

    let mut packages = Vec::with_capacity(plans.len());
    for language in &plans {
        let language_dir = work_dir.join(language.locale.language_id);
        fs::create_dir_all(&language_dir, true).await?;

        let wxs = language_dir.join("main.wxs");
        WxsDocument::new(settings, &codes, language.locale, icon.as_deref())?
            .write(&wxs)
            .await?;

        let object = build::run_candle(&wxs, &language_dir, msi.arch).await?;

        let package = settings.destination_dir().join(format!(
            "{}-{}-{}-{}.msi",
            setup.application(),
            setup.version(),
            msi.arch.wix_platform(),
            language.locale.language_id
        ));
        build::run_light(&object, language, &package)
            .await
            .with_context(|| format!("linking MSI package for {}", language.locale))?;

        log::info!("✓ Created MSI installer: {}", package.display());
        packages.push(package);
    }

    Ok(packages)
}
