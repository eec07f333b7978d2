//! Core Settings struct and implementations.

use super::{ApplicationDescription, DmgSettings, MacOsSettings, MsiSettings, SetupDescription};
use crate::bundler::platform::PackageType;
use std::path::{Path, PathBuf};

/// Main settings for bundler operations.
///
/// Aggregates the frozen setup description, its applications and the
/// per-target settings. Constructed via [`SettingsBuilder`].
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_setup::bundler::{SettingsBuilder, SetupBuilder};
///
/// # fn example() -> kodegen_bundler_setup::bundler::Result<()> {
/// let setup = SetupBuilder::new()
///     .application("Demo")
///     .project_dir("/work/demo")
///     .build()?;
/// let settings = SettingsBuilder::new().setup(setup).build()?;
/// assert_eq!(settings.applications().len(), 1);
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`SettingsBuilder`] - Builder for constructing Settings
/// - [`SetupDescription`] - Setup-wide defaults
///
/// [`SettingsBuilder`]: super::SettingsBuilder
#[derive(Clone, Debug)]
pub struct Settings {
    setup: SetupDescription,
    applications: Vec<ApplicationDescription>,
    macos: MacOsSettings,
    dmg: DmgSettings,
    msi: MsiSettings,

    /// None means use the host's default package types.
    package_types: Option<Vec<PackageType>>,

    /// None means `<build_dir>/i18n`.
    cache_dir: Option<PathBuf>,
}

impl Settings {
    /// Returns the setup description.
    pub fn setup(&self) -> &SetupDescription {
        &self.setup
    }

    /// Returns the applications in declaration order.
    pub fn applications(&self) -> &[ApplicationDescription] {
        &self.applications
    }

    /// Returns the macOS bundle settings.
    pub fn macos(&self) -> &MacOsSettings {
        &self.macos
    }

    /// Returns the disk image settings.
    pub fn dmg(&self) -> &DmgSettings {
        &self.dmg
    }

    /// Returns the MSI settings.
    pub fn msi(&self) -> &MsiSettings {
        &self.msi
    }

    /// Returns the package types to create.
    ///
    /// None means use platform defaults.
    pub fn package_types(&self) -> Option<&[PackageType]> {
        self.package_types.as_deref()
    }

    /// Returns the localization cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| self.setup.build_dir().join("i18n"))
    }

    /// Returns the directory receiving the finished artifacts.
    pub fn destination_dir(&self) -> &Path {
        self.setup.destination_dir()
    }

    /// Whether macOS bundles and images are signed.
    pub fn should_sign(&self) -> bool {
        self.macos.signing_identity.is_some()
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        setup: SetupDescription,
        applications: Vec<ApplicationDescription>,
        macos: MacOsSettings,
        dmg: DmgSettings,
        msi: MsiSettings,
        package_types: Option<Vec<PackageType>>,
        cache_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            setup,
            applications,
            macos,
            dmg,
            msi,
            package_types,
            cache_dir,
        }
    }
}
