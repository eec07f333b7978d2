//! Supported installer locales.
//!
//! Maps user-facing locale identifiers (`"en"`, `"de-DE"`, `"pt_br"`) to the
//! canonical descriptor used by localization documents and the MSI compiler.

use crate::bundler::error::{Error, Result};
use std::fmt;

/// One supported installer locale.
///
/// Descriptors are immutable and only ever obtained from [`resolve_locale`],
/// so two descriptors for the same locale are the same `'static` entry.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct LocaleDescriptor {
    /// Short language id used for lookups and default-language decisions.
    pub language_id: &'static str,
    /// Culture tag written into localization documents (e.g. `de-DE`).
    pub culture: &'static str,
    /// Windows language code identifier.
    pub lcid: u16,
    /// ANSI code page of the culture.
    pub codepage: u16,
}

impl LocaleDescriptor {
    const fn new(language_id: &'static str, culture: &'static str, lcid: u16, codepage: u16) -> Self {
        Self {
            language_id,
            culture,
            lcid,
            codepage,
        }
    }

    /// Returns whether this locale is the given default language.
    ///
    /// Compares language ids case-insensitively.
    pub fn is_language(&self, other: &LocaleDescriptor) -> bool {
        self.language_id.eq_ignore_ascii_case(other.language_id)
    }
}

impl fmt::Display for LocaleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.language_id, self.culture)
    }
}

/// The closed table of supported locales.
pub static SUPPORTED_LOCALES: &[LocaleDescriptor] = &[
    LocaleDescriptor::new("ar", "ar-SA", 1025, 1256),
    LocaleDescriptor::new("bg", "bg-BG", 1026, 1251),
    LocaleDescriptor::new("ca", "ca-ES", 1027, 1252),
    LocaleDescriptor::new("cs", "cs-CZ", 1029, 1250),
    LocaleDescriptor::new("da", "da-DK", 1030, 1252),
    LocaleDescriptor::new("de", "de-DE", 1031, 1252),
    LocaleDescriptor::new("el", "el-GR", 1032, 1253),
    LocaleDescriptor::new("en", "en-US", 1033, 1252),
    LocaleDescriptor::new("en-GB", "en-GB", 2057, 1252),
    LocaleDescriptor::new("es", "es-ES", 3082, 1252),
    LocaleDescriptor::new("et", "et-EE", 1061, 1257),
    LocaleDescriptor::new("fi", "fi-FI", 1035, 1252),
    LocaleDescriptor::new("fr", "fr-FR", 1036, 1252),
    LocaleDescriptor::new("he", "he-IL", 1037, 1255),
    LocaleDescriptor::new("hr", "hr-HR", 1050, 1250),
    LocaleDescriptor::new("hu", "hu-HU", 1038, 1250),
    LocaleDescriptor::new("it", "it-IT", 1040, 1252),
    LocaleDescriptor::new("ja", "ja-JP", 1041, 932),
    LocaleDescriptor::new("ko", "ko-KR", 1042, 949),
    LocaleDescriptor::new("lt", "lt-LT", 1063, 1257),
    LocaleDescriptor::new("lv", "lv-LV", 1062, 1257),
    LocaleDescriptor::new("nb", "nb-NO", 1044, 1252),
    LocaleDescriptor::new("nl", "nl-NL", 1043, 1252),
    LocaleDescriptor::new("pl", "pl-PL", 1045, 1250),
    LocaleDescriptor::new("pt", "pt-PT", 2070, 1252),
    LocaleDescriptor::new("pt-BR", "pt-BR", 1046, 1252),
    LocaleDescriptor::new("ro", "ro-RO", 1048, 1250),
    LocaleDescriptor::new("ru", "ru-RU", 1049, 1251),
    LocaleDescriptor::new("sk", "sk-SK", 1051, 1250),
    LocaleDescriptor::new("sl", "sl-SI", 1060, 1250),
    LocaleDescriptor::new("sv", "sv-SE", 1053, 1252),
    LocaleDescriptor::new("th", "th-TH", 1054, 874),
    LocaleDescriptor::new("tr", "tr-TR", 1055, 1254),
    LocaleDescriptor::new("uk", "uk-UA", 1058, 1251),
    LocaleDescriptor::new("zh-CN", "zh-CN", 2052, 936),
    LocaleDescriptor::new("zh-TW", "zh-TW", 1028, 950),
];

/// Position of `en` in [`SUPPORTED_LOCALES`].
const ENGLISH: usize = 7;

/// Locale used when a setup does not name a default language (`en`).
pub fn fallback_locale() -> &'static LocaleDescriptor {
    &SUPPORTED_LOCALES[ENGLISH]
}

/// Resolves a locale identifier against [`SUPPORTED_LOCALES`].
///
/// Matches the language id first and the culture tag second, both
/// case-insensitively; `_` is accepted in place of `-`.
///
/// # Errors
///
/// Returns [`Error::UnknownLocale`] for any identifier outside the table.
/// There is no fallback locale.
pub fn resolve_locale(identifier: &str) -> Result<&'static LocaleDescriptor> {
    let wanted = identifier.trim().replace('_', "-");

    SUPPORTED_LOCALES
        .iter()
        .find(|locale| locale.language_id.eq_ignore_ascii_case(&wanted))
        .or_else(|| {
            SUPPORTED_LOCALES
                .iter()
                .find(|locale| locale.culture.eq_ignore_ascii_case(&wanted))
        })
        .ok_or_else(|| Error::UnknownLocale(identifier.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_case_insensitive() {
        let lower = resolve_locale("de").unwrap();
        let upper = resolve_locale("DE").unwrap();
        assert!(std::ptr::eq(lower, upper));
        assert_eq!(lower.culture, "de-DE");
    }

    #[test]
    fn test_resolve_by_culture_tag() {
        assert_eq!(resolve_locale("en-us").unwrap().language_id, "en");
        assert_eq!(resolve_locale("pt_br").unwrap().language_id, "pt-BR");
    }

    #[test]
    fn test_table_is_total() {
        for locale in SUPPORTED_LOCALES {
            assert!(std::ptr::eq(resolve_locale(locale.language_id).unwrap(), locale));
            assert!(std::ptr::eq(resolve_locale(locale.culture).unwrap(), locale));
            assert!(std::ptr::eq(
                resolve_locale(&locale.language_id.to_lowercase()).unwrap(),
                locale
            ));
        }
    }

    #[test]
    fn test_fallback_is_english() {
        assert_eq!(fallback_locale().language_id, "en");
        assert!(std::ptr::eq(fallback_locale(), resolve_locale("en").unwrap()));
    }

    #[test]
    fn test_unknown_locale_fails() {
        for bad in ["xx", "", "klingon", "de-XX"] {
            assert!(matches!(resolve_locale(bad), Err(Error::UnknownLocale(_))));
        }
    }

    #[test]
    fn test_regional_variant_is_not_base_language() {
        let en = resolve_locale("en").unwrap();
        let gb = resolve_locale("en-GB").unwrap();
        assert!(!gb.is_language(en));
        assert!(en.is_language(resolve_locale("EN").unwrap()));
    }
}
