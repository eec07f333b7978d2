//! macOS platform-specific settings.

use crate::bundler::i18n::LocalizedResource;
use std::path::PathBuf;

/// macOS application bundle (.app) configuration.
///
/// # Configuration
///
/// ```toml
/// [macos]
/// minimum_system_version = "10.15"
/// category = "public.app-category.developer-tools"
/// signing_identity = "Developer ID Application: Your Name (TEAMID)"
/// entitlements = "entitlements.plist"
/// ```
///
/// # See Also
///
/// - [`DmgSettings`] - DMG disk image configuration
#[derive(Clone, Debug, serde::Deserialize)]
pub struct MacOsSettings {
    /// Minimum macOS version required (LSMinimumSystemVersion).
    ///
    /// Default: None (key omitted)
    #[serde(default)]
    pub minimum_system_version: Option<String>,

    /// Application category (LSApplicationCategoryType).
    ///
    /// Default: None
    #[serde(default)]
    pub category: Option<String>,

    /// Code signing identity name.
    ///
    /// Use "-" for ad-hoc signing (development only). Bundles are only
    /// signed when an identity is configured.
    ///
    /// Default: None (unsigned)
    #[serde(default)]
    pub signing_identity: Option<String>,

    /// Path to entitlements.plist for code signing.
    ///
    /// Default: None
    #[serde(default)]
    pub entitlements: Option<PathBuf>,

    /// Sign with the hardened runtime.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub hardened_runtime: bool,
}

impl Default for MacOsSettings {
    fn default() -> Self {
        Self {
            minimum_system_version: None,
            category: None,
            signing_identity: None,
            entitlements: None,
            hardened_runtime: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// macOS DMG disk image configuration.
///
/// # Configuration
///
/// ```toml
/// [dmg]
/// background = "assets/dmg-background.png"
/// window_width = 540
/// window_height = 380
/// welcome_pages = ["installer/welcome.rtf", { locale = "de", resource = "installer/willkommen.rtf" }]
/// ```
#[derive(Clone, Debug)]
pub struct DmgSettings {
    /// Volume name. Falls back to the setup's application name.
    pub volume_name: Option<String>,

    /// Finder window width in points.
    pub window_width: u32,

    /// Finder window height in points.
    pub window_height: u32,

    /// Icon size in the Finder window.
    pub icon_size: u32,

    /// Label font size in the Finder window.
    pub font_size: u32,

    /// Background image of the Finder window.
    pub background: Option<PathBuf>,

    /// Localized welcome pages.
    pub welcome_pages: Vec<LocalizedResource>,

    /// Localized conclusion pages.
    pub conclusion_pages: Vec<LocalizedResource>,
}

impl Default for DmgSettings {
    fn default() -> Self {
        Self {
            volume_name: None,
            window_width: 400,
            window_height: 300,
            icon_size: 128,
            font_size: 16,
            background: None,
            welcome_pages: Vec::new(),
            conclusion_pages: Vec::new(),
        }
    }
}
