//! Builders for [`SetupDescription`] and [`Settings`].

use super::{
    ApplicationDescription, DmgSettings, MacOsSettings, MsiSettings, Settings, SetupDescription,
};
use crate::bundler::{
    error::{Context, Error, ErrorExt, Result},
    i18n::{fallback_locale, resolve_locale},
    platform::PackageType,
    resources::IconSet,
};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`SetupDescription`].
///
/// # Required
///
/// `application` must be set. `default_language` must name a supported
/// locale; it defaults to `en`.
///
/// # Defaults
///
/// - `project_dir`: current directory
/// - `build_dir`: `<project_dir>/target/setup`
/// - `destination_dir`: `<build_dir>/bundle`
///
/// Relative directories are resolved against `project_dir`.
#[derive(Debug, Default)]
pub struct SetupBuilder {
    application: Option<String>,
    app_identifier: Option<String>,
    vendor: Option<String>,
    version: Option<String>,
    copyright: Option<String>,
    bundle_identifier: Option<String>,
    description: Option<String>,
    main_archive: Option<PathBuf>,
    main_class: Option<String>,
    icons: Option<IconSet>,
    default_language: Option<String>,
    destination_dir: Option<PathBuf>,
    project_dir: Option<PathBuf>,
    build_dir: Option<PathBuf>,
    runtime_launcher_name: Option<String>,
    launcher_path: Option<PathBuf>,
    binaries_dir: Option<PathBuf>,
    resources: Vec<String>,
}

impl SetupBuilder {
    /// Creates a new setup builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the application name shown to users.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn application(mut self, application: impl Into<String>) -> Self {
        self.application = Some(application.into());
        self
    }

    /// Sets the identifier used for file names and as the fallback executable.
    ///
    /// Default: `application`
    pub fn app_identifier(mut self, app_identifier: impl Into<String>) -> Self {
        self.app_identifier = Some(app_identifier.into());
        self
    }

    /// Sets the vendor shown in installers and used for registry keys.
    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    /// Sets the product version.
    ///
    /// Default: `1.0.0`
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the copyright notice written into bundle manifests.
    pub fn copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    /// Sets the reverse-DNS bundle identifier.
    ///
    /// Default: `app_identifier`
    pub fn bundle_identifier(mut self, bundle_identifier: impl Into<String>) -> Self {
        self.bundle_identifier = Some(bundle_identifier.into());
        self
    }

    /// Sets the description applications inherit.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the archive the runtime launcher starts.
    pub fn main_archive<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.main_archive = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the entry class the runtime launcher starts.
    pub fn main_class(mut self, main_class: impl Into<String>) -> Self {
        self.main_class = Some(main_class.into());
        self
    }

    /// Sets the icon set applications inherit.
    pub fn icons(mut self, icons: IconSet) -> Self {
        self.icons = Some(icons);
        self
    }

    /// Sets the default resource language.
    ///
    /// Default: `en`
    pub fn default_language(mut self, identifier: impl Into<String>) -> Self {
        self.default_language = Some(identifier.into());
        self
    }

    /// Sets the directory receiving finished artifacts.
    ///
    /// Default: `<build_dir>/bundle`
    pub fn destination_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.destination_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory relative paths resolve against.
    ///
    /// Default: current directory
    pub fn project_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the scratch directory for intermediate files.
    ///
    /// Default: `<project_dir>/target/setup`
    pub fn build_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Wraps every application in the named runtime launcher.
    pub fn runtime_launcher_name(mut self, name: impl Into<String>) -> Self {
        self.runtime_launcher_name = Some(name.into());
        self
    }

    /// Sets the native launcher stub copied into launcher bundles.
    pub fn launcher_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.launcher_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory holding native application executables.
    pub fn binaries_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.binaries_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets glob patterns of auxiliary files.
    ///
    /// Default: Empty
    pub fn resources(mut self, patterns: Vec<String>) -> Self {
        self.resources = patterns;
        self
    }

    /// Builds the setup description.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] if `application` is missing or blank
    /// - [`Error::UnknownLocale`] if `default_language` is not supported
    pub fn build(self) -> Result<SetupDescription> {
        let application = self
            .application
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::InvalidConfiguration("application name is required".into()))?;

        let default_locale = match self.default_language.as_deref() {
            Some(identifier) => resolve_locale(identifier)?,
            None => fallback_locale(),
        };

        let project_dir = self.project_dir.unwrap_or_else(|| PathBuf::from("."));
        let project_dir = project_dir
            .absolutize()
            .map(|p| p.into_owned())
            .fs_context("resolving project directory", &project_dir)?;

        let build_dir = under(
            &project_dir,
            self.build_dir
                .unwrap_or_else(|| PathBuf::from("target/setup")),
        );
        let destination_dir = under(
            &project_dir,
            self.destination_dir
                .unwrap_or_else(|| build_dir.join("bundle")),
        );

        Ok(SetupDescription {
            application,
            app_identifier: self.app_identifier,
            vendor: self.vendor,
            version: self.version,
            copyright: self.copyright,
            bundle_identifier: self.bundle_identifier,
            description: self.description,
            main_archive: self.main_archive,
            main_class: self.main_class,
            icons: self.icons,
            default_locale,
            destination_dir,
            build_dir,
            runtime_launcher_name: self.runtime_launcher_name,
            launcher_path: self.launcher_path.map(|p| under(&project_dir, p)),
            binaries_dir: self.binaries_dir.map(|p| under(&project_dir, p)),
            resources: self.resources,
            project_dir,
        })
    }
}

fn under(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Builder for constructing [`Settings`].
///
/// # See Also
///
/// - [`Settings`] - The built settings struct
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    setup: Option<SetupDescription>,
    applications: Vec<ApplicationDescription>,
    macos: MacOsSettings,
    dmg: DmgSettings,
    msi: MsiSettings,
    package_types: Option<Vec<PackageType>>,
    cache_dir: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the setup description.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn setup(mut self, setup: SetupDescription) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Sets the applications.
    ///
    /// Default: one application that inherits everything from the setup
    pub fn applications(mut self, applications: Vec<ApplicationDescription>) -> Self {
        self.applications = applications;
        self
    }

    pub fn macos(mut self, settings: MacOsSettings) -> Self {
        self.macos = settings;
        self
    }

    pub fn dmg(mut self, settings: DmgSettings) -> Self {
        self.dmg = settings;
        self
    }

    pub fn msi(mut self, settings: MsiSettings) -> Self {
        self.msi = settings;
        self
    }

    /// Sets specific package types to create.
    ///
    /// Default: None (platform defaults)
    pub fn package_types(mut self, types: Vec<PackageType>) -> Self {
        self.package_types = Some(types);
        self
    }

    /// Overrides the localization cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `setup` is missing.
    pub fn build(self) -> Result<Settings> {
        let setup = self.setup.context("setup is required")?;

        let applications = if self.applications.is_empty() {
            log::debug!("No applications declared, using the setup defaults");
            vec![ApplicationDescription::default()]
        } else {
            self.applications
        };

        Ok(Settings::new(
            setup,
            applications,
            self.macos,
            self.dmg,
            self.msi,
            self.package_types,
            self.cache_dir,
        ))
    }
}
