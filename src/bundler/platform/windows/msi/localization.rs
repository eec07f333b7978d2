//! Per-language inputs of the MSI compiler.

use crate::bundler::{
    error::Result,
    i18n::{self, LocaleDescriptor, LocalizationCache},
    settings::Settings,
};
use std::path::PathBuf;

/// Everything `light` needs for one installer language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguagePlan {
    /// The installer language.
    pub locale: &'static LocaleDescriptor,
    /// Materialized localization document, if a string table exists.
    pub localization: Option<PathBuf>,
    /// License shown by the installer UI.
    pub license: Option<PathBuf>,
}

/// Resolves the installer languages, in configuration order.
///
/// Without configured languages the setup's default language is used.
/// Duplicate languages are built once.
///
/// # Errors
///
/// [`Error::UnknownLocale`](crate::bundler::Error::UnknownLocale) for an
/// unsupported language; this aborts the whole package.
pub fn languages(settings: &Settings) -> Result<Vec<&'static LocaleDescriptor>> {
    let msi = settings.msi();
    if msi.languages.is_empty() {
        return Ok(vec![settings.setup().default_locale()]);
    }

    let mut locales: Vec<&'static LocaleDescriptor> = Vec::with_capacity(msi.languages.len());
    for identifier in &msi.languages {
        let locale = i18n::resolve_locale(identifier)?;
        if !locales.iter().any(|known| known.is_language(locale)) {
            locales.push(locale);
        }
    }
    Ok(locales)
}

/// Builds the plan for every installer language.
///
/// A language without its own string table gets no localization document
/// and the compiler's built-in strings. A language without its own license
/// falls back to the default-language license.
pub fn plan(settings: &Settings, cache: &LocalizationCache) -> Result<Vec<LanguagePlan>> {
    let setup = settings.setup();
    let msi = settings.msi();

    let default_license = i18n::find_by_locale(&msi.license_files, setup.default_language())
        .and_then(|entry| entry.source_file(setup));

    let plans = languages(settings)?
        .into_iter()
        .map(|locale| {
            let localization = cache.find_by_locale(&msi.i18n, locale.language_id, setup);
            if localization.is_none() {
                log::debug!("No localization document for {}", locale);
            }

            let license = i18n::find_by_locale(&msi.license_files, locale.language_id)
                .and_then(|entry| entry.source_file(setup))
                .or_else(|| default_license.clone());

            LanguagePlan {
                locale,
                localization,
                license,
            }
        })
        .collect();

    Ok(plans)
}
