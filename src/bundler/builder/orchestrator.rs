//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that builds the
//! requested package types and collects their artifacts.

use super::{
    checksum::calculate_sha256,
    signing::{BundleSigner, CodesignSigner},
    tool_detection::{HAS_CANDLE, HAS_CODESIGN, HAS_HDIUTIL, HAS_LIGHT, missing_tool},
};
use crate::{
    bail,
    bundler::{
        BundledArtifact, PackageType, Result, Settings,
        i18n::LocalizationCache,
        platform,
        resources::{IconConverter, ImageFactory},
        utils::fs::total_size,
    },
};

/// Main bundler orchestrator.
///
/// Owns the settings, the localization cache, the icon converter and the
/// optional signer, and delegates each package type to its platform module.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_setup::bundler::{Bundler, PackageType, Settings};
///
/// # async fn example(settings: Settings) -> kodegen_bundler_setup::bundler::Result<()> {
/// let bundler = Bundler::new(settings);
///
/// // Bundle with platform defaults
/// let artifacts = bundler.bundle().await?;
///
/// // Or bundle specific types
/// let artifacts = bundler.bundle_types(&[PackageType::Msi]).await?;
/// # Ok(())
/// # }
/// ```
pub struct Bundler {
    settings: Settings,
    cache: LocalizationCache,
    image_factory: Box<dyn ImageFactory>,
    signer: Option<Box<dyn BundleSigner>>,
}

impl std::fmt::Debug for Bundler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("settings", &self.settings)
            .field("cache", &self.cache.dir())
            .field("signer", &self.signer.as_ref().map(|_| "<BundleSigner>"))
            .finish()
    }
}

impl Bundler {
    /// Creates a bundler with the default icon converter.
    ///
    /// Signs with `codesign` when the macOS settings name an identity.
    pub fn new(settings: Settings) -> Self {
        let signer = CodesignSigner::from_settings(settings.macos(), settings.setup())
            .map(|signer| Box::new(signer) as Box<dyn BundleSigner>);
        if settings.should_sign() && !*HAS_CODESIGN {
            log::warn!("A signing identity is configured but codesign was not found in PATH");
        }

        Self {
            cache: LocalizationCache::new(settings.cache_dir()),
            image_factory: Box::new(IconConverter),
            signer,
            settings,
        }
    }

    /// Replaces the icon converter.
    pub fn with_image_factory(mut self, factory: Box<dyn ImageFactory>) -> Self {
        self.image_factory = factory;
        self
    }

    /// Replaces the signer; `None` disables signing.
    pub fn with_signer(mut self, signer: Option<Box<dyn BundleSigner>>) -> Self {
        self.signer = signer;
        self
    }

    /// Executes bundling operations for default platform types.
    ///
    /// Uses [`Settings::package_types()`] if set, platform defaults otherwise.
    pub async fn bundle(&self) -> Result<Vec<BundledArtifact>> {
        let package_types = self.determine_platform_types();
        self.bundle_types(&package_types).await
    }

    /// Executes bundling operations for specific package types.
    ///
    /// Types are built in [`PackageType::priority()`] order. The first
    /// failing type aborts the run.
    pub async fn bundle_types(&self, types: &[PackageType]) -> Result<Vec<BundledArtifact>> {
        let mut ordered: Vec<PackageType> = Vec::with_capacity(types.len());
        for package_type in types {
            if !ordered.contains(package_type) {
                ordered.push(*package_type);
            }
        }
        ordered.sort_by_key(|t| t.priority());

        let mut artifacts = Vec::new();

        for package_type in ordered {
            log::info!("Bundling {} package", package_type);

            let signer = self.signer.as_deref();
            let paths = match package_type {
                PackageType::AppBundle => {
                    platform::macos::app::bundle_project(
                        &self.settings,
                        self.image_factory.as_ref(),
                        signer,
                    )
                    .await?
                }
                PackageType::Dmg => {
                    if let Some(tool) = missing_tool(&[("hdiutil", &HAS_HDIUTIL)]) {
                        bail!("{} is required to build {} packages", tool, package_type);
                    }
                    platform::macos::dmg::bundle_project(
                        &self.settings,
                        self.image_factory.as_ref(),
                        signer,
                    )
                    .await?
                }
                PackageType::Msi => {
                    if let Some(tool) =
                        missing_tool(&[("candle", &HAS_CANDLE), ("light", &HAS_LIGHT)])
                    {
                        bail!("WiX {} is required to build {} packages", tool, package_type);
                    }
                    platform::windows::msi::bundle_project(
                        &self.settings,
                        &self.cache,
                        self.image_factory.as_ref(),
                    )
                    .await?
                }
            };

            let Some(first_path) = paths.first() else {
                bail!(
                    "Platform bundler for {} returned no paths - this indicates a bundler bug",
                    package_type
                );
            };
            let checksum = calculate_sha256(first_path).await?;

            let mut size = 0u64;
            for p in &paths {
                size += total_size(p)?;
            }

            artifacts.push(BundledArtifact {
                package_type,
                paths,
                size,
                checksum,
            });
        }

        Ok(artifacts)
    }

    /// Returns a reference to the bundler settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the localization cache.
    pub fn cache(&self) -> &LocalizationCache {
        &self.cache
    }

    fn determine_platform_types(&self) -> Vec<PackageType> {
        match self.settings.package_types() {
            Some(types) => types.to_vec(),
            None => PackageType::all_for_current_platform(),
        }
    }
}
