//! Setup-wide description shared by every application of an installer.

use crate::bundler::{
    error::Result,
    i18n::{LocaleDescriptor, resolve_locale},
    resources::IconSet,
};
use std::path::{Path, PathBuf};

/// Global description of one installer build.
///
/// Holds the setup-wide defaults that every [`ApplicationDescription`]
/// falls back to. Constructed through [`SetupBuilder`]; the setters exist
/// for the configuration phase and must not be used once bundling started.
///
/// Application getters read these values at call time, so a change made
/// here before an application is read is visible through that application.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_setup::bundler::{ApplicationDescription, SetupBuilder};
///
/// # fn example() -> kodegen_bundler_setup::bundler::Result<()> {
/// let mut setup = SetupBuilder::new()
///     .application("Demo")
///     .default_language("en")
///     .build()?;
/// let app = ApplicationDescription::default();
///
/// assert_eq!(app.display_name(&setup), "Demo");
/// setup.set_application("Renamed");
/// assert_eq!(app.display_name(&setup), "Renamed");
/// # Ok(())
/// # }
/// ```
///
/// [`ApplicationDescription`]: super::ApplicationDescription
/// [`SetupBuilder`]: super::SetupBuilder
#[derive(Clone, Debug)]
pub struct SetupDescription {
    pub(super) application: String,
    pub(super) app_identifier: Option<String>,
    pub(super) vendor: Option<String>,
    pub(super) version: Option<String>,
    pub(super) copyright: Option<String>,
    pub(super) bundle_identifier: Option<String>,
    pub(super) description: Option<String>,
    pub(super) main_archive: Option<PathBuf>,
    pub(super) main_class: Option<String>,
    pub(super) icons: Option<IconSet>,
    pub(super) default_locale: &'static LocaleDescriptor,
    pub(super) destination_dir: PathBuf,
    pub(super) project_dir: PathBuf,
    pub(super) build_dir: PathBuf,
    pub(super) runtime_launcher_name: Option<String>,
    pub(super) launcher_path: Option<PathBuf>,
    pub(super) binaries_dir: Option<PathBuf>,
    pub(super) resources: Vec<String>,
}

impl SetupDescription {
    /// Application name shown to users.
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Machine-friendly identifier. Falls back to [`application`](Self::application).
    pub fn app_identifier(&self) -> &str {
        self.app_identifier.as_deref().unwrap_or(&self.application)
    }

    /// Publisher name.
    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    /// Version string, `1.0.0` when unset.
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or("1.0.0")
    }

    /// Copyright notice.
    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }

    /// Reverse-DNS bundle identifier. Falls back to the app identifier.
    pub fn bundle_identifier(&self) -> &str {
        self.bundle_identifier
            .as_deref()
            .unwrap_or_else(|| self.app_identifier())
    }

    /// Setup-wide description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Setup-wide main archive (the launched jar or module).
    pub fn main_archive(&self) -> Option<&Path> {
        self.main_archive.as_deref()
    }

    /// Setup-wide main class inside the main archive.
    pub fn main_class(&self) -> Option<&str> {
        self.main_class.as_deref()
    }

    /// Setup-wide icon set.
    pub fn icons(&self) -> Option<&IconSet> {
        self.icons.as_ref()
    }

    /// Locale of the default resource language.
    pub fn default_locale(&self) -> &'static LocaleDescriptor {
        self.default_locale
    }

    /// Language id of the default resource language.
    pub fn default_language(&self) -> &'static str {
        self.default_locale.language_id
    }

    /// Directory receiving the finished artifacts.
    pub fn destination_dir(&self) -> &Path {
        &self.destination_dir
    }

    /// Base directory for relative paths.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Scratch directory for intermediate files.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Name of the managed-runtime launcher, if one wraps the applications.
    pub fn runtime_launcher_name(&self) -> Option<&str> {
        self.runtime_launcher_name.as_deref()
    }

    /// Native launcher stub copied into bundles that use a launcher.
    pub fn launcher_path(&self) -> Option<&Path> {
        self.launcher_path.as_deref()
    }

    /// Directory holding application executables when no launcher is used.
    pub fn binaries_dir(&self) -> Option<&Path> {
        self.binaries_dir.as_deref()
    }

    /// Glob patterns of auxiliary files copied next to the main archive.
    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    /// Joins a relative path onto the project directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    /// Renames the application.
    pub fn set_application(&mut self, application: impl Into<String>) {
        self.application = application.into();
    }

    /// Replaces the default description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Replaces the default main archive.
    pub fn set_main_archive(&mut self, main_archive: Option<PathBuf>) {
        self.main_archive = main_archive;
    }

    /// Replaces the default main class.
    pub fn set_main_class(&mut self, main_class: Option<String>) {
        self.main_class = main_class;
    }

    /// Replaces the default icon set.
    pub fn set_icons(&mut self, icons: Option<IconSet>) {
        self.icons = icons;
    }

    /// Redirects finished artifacts to `destination_dir`.
    pub fn set_destination_dir(&mut self, destination_dir: impl Into<PathBuf>) {
        self.destination_dir = destination_dir.into();
    }

    /// Changes the default resource language.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnknownLocale`](crate::bundler::Error::UnknownLocale)
    /// and leaves the current language in place.
    pub fn set_default_language(&mut self, identifier: &str) -> Result<()> {
        self.default_locale = resolve_locale(identifier)?;
        Ok(())
    }
}
