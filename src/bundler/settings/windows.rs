//! Windows installer settings.

use super::Arch;
use crate::bundler::i18n::LocalizedResource;

/// WiX MSI installer configuration.
///
/// # Configuration
///
/// ```toml
/// [msi]
/// languages = ["en", "de"]
/// arch = "x86_64"
/// i18n = ["installer/messages.properties", { locale = "de", resource = "installer/messages_de.properties" }]
/// license_files = ["installer/license.rtf"]
/// ```
///
/// One package is compiled per language. String tables (`i18n`) are
/// converted into WiX localization documents.
#[derive(Clone, Debug)]
pub struct MsiSettings {
    /// Installer languages.
    ///
    /// Default: Empty (the setup's default language)
    pub languages: Vec<String>,

    /// Target architecture.
    ///
    /// Default: the host architecture
    pub arch: Arch,

    /// Localized string tables.
    pub i18n: Vec<LocalizedResource>,

    /// Localized license files (.rtf).
    pub license_files: Vec<LocalizedResource>,

    /// Fixed upgrade code. Derived from the app identifier when unset.
    pub upgrade_code: Option<String>,

    /// Install for all users instead of the current user.
    ///
    /// Default: true
    pub per_machine: bool,
}

impl Default for MsiSettings {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            arch: Arch::current(),
            i18n: Vec::new(),
            license_files: Vec::new(),
            upgrade_code: None,
            per_machine: true,
        }
    }
}
