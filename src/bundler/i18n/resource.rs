//! Localized resource entries and the rules for adding them to a list.

use super::locale::{LocaleDescriptor, resolve_locale};
use crate::bundler::{error::Result, settings::SetupDescription};
use path_absolutize::Absolutize;
use std::{fmt, path::PathBuf};

/// One localized artifact: a locale, an optional source file and an
/// explicit overridable flag.
///
/// Lists of entries are not deduplicated by locale; lookups return the
/// first match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalizedResource {
    /// Locale the resource is written in.
    pub locale: &'static LocaleDescriptor,
    /// Source file, absolute or relative to the setup's project directory.
    ///
    /// `None` means no localization was requested.
    pub resource: Option<PathBuf>,
    /// Marks every string of a generated document overridable.
    pub overridable: bool,
}

impl LocalizedResource {
    /// Creates an entry that is not explicitly overridable.
    pub fn new(locale: &'static LocaleDescriptor, resource: Option<PathBuf>) -> Self {
        Self {
            locale,
            resource,
            overridable: false,
        }
    }

    /// Replaces the locale.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnknownLocale`](crate::bundler::Error::UnknownLocale)
    /// for identifiers outside the supported table.
    pub fn with_locale(mut self, identifier: &str) -> Result<Self> {
        self.locale = resolve_locale(identifier)?;
        Ok(self)
    }

    /// Replaces the source file.
    pub fn with_resource(mut self, resource: impl Into<PathBuf>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Sets the explicit overridable flag.
    pub fn with_overridable(mut self, overridable: bool) -> Self {
        self.overridable = overridable;
        self
    }

    /// Whether this entry is written in the setup's default language.
    pub fn is_default_language(&self, setup: &SetupDescription) -> bool {
        self.locale.is_language(setup.default_locale())
    }

    /// Resolves the source file to an absolute path.
    ///
    /// Relative paths are taken relative to the setup's project directory.
    pub fn source_file(&self, setup: &SetupDescription) -> Option<PathBuf> {
        let resource = self.resource.as_ref()?;
        let path = if resource.is_absolute() {
            resource.clone()
        } else {
            setup.project_dir().join(resource)
        };
        let absolute = path.absolutize().map(|p| p.into_owned()).ok();
        Some(absolute.unwrap_or(path))
    }
}

/// Configuration step applied once to a freshly built default entry.
pub type ConfigureResource =
    Box<dyn FnOnce(LocalizedResource) -> Result<LocalizedResource> + Send>;

/// How a new localized entry is described.
pub enum ResourceSpec {
    /// A source file in the setup's default language.
    Path(PathBuf),
    /// A configuration step that adjusts a default entry.
    Configure(ConfigureResource),
}

impl ResourceSpec {
    /// Wraps a configuration closure.
    pub fn configure<F>(apply: F) -> Self
    where
        F: FnOnce(LocalizedResource) -> Result<LocalizedResource> + Send + 'static,
    {
        Self::Configure(Box::new(apply))
    }
}

impl fmt::Debug for ResourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Configure(_) => f.write_str("Configure(..)"),
        }
    }
}

impl From<PathBuf> for ResourceSpec {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Appends a new entry built from `spec` to `list`.
///
/// Both forms start from an entry in the setup's default locale. A path is
/// attached to it directly; a configuration step receives it and returns the
/// entry to append.
///
/// # Errors
///
/// Propagates errors raised by the configuration step, such as an unknown
/// locale.
pub fn add_localized_resource(
    setup: &SetupDescription,
    list: &mut Vec<LocalizedResource>,
    spec: ResourceSpec,
) -> Result<()> {
    let default_entry = LocalizedResource::new(setup.default_locale(), None);

    let entry = match spec {
        ResourceSpec::Path(path) => default_entry.with_resource(path),
        ResourceSpec::Configure(apply) => apply(default_entry)?,
    };

    log::debug!(
        "Adding localized resource {:?} for {}",
        entry.resource,
        entry.locale
    );
    list.push(entry);
    Ok(())
}

/// Returns the first entry whose language id matches `identifier`,
/// case-insensitively.
pub fn find_by_locale<'a>(
    list: &'a [LocalizedResource],
    identifier: &str,
) -> Option<&'a LocalizedResource> {
    list.iter()
        .find(|entry| entry.locale.language_id.eq_ignore_ascii_case(identifier))
}
