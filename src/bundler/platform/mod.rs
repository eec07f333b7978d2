//! Platform-specific bundling implementations.
//!
//! | Package type | Output | Module |
//! |--------------|--------|--------|
//! | [`PackageType::AppBundle`] | `.app` directories | [`macos::app`] |
//! | [`PackageType::Dmg`] | `.dmg` disk image | [`macos::dmg`] |
//! | [`PackageType::Msi`] | `.msi` per language | [`windows::msi`] |
//!
//! All targets compile on every host. The external tools they drive
//! (`hdiutil`, `candle`, `light`) are looked up at run time.
//!
//! # Bundling Order
//!
//! Disk images stage their own application bundles, but are still built
//! after the standalone targets so that a failing image does not hide the
//! cheaper artifacts. See [`PackageType::priority()`].

pub mod macos;
pub mod windows;

use std::{fmt, str::FromStr};

/// Supported package types for bundling.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum PackageType {
    /// macOS application bundle (.app).
    #[serde(rename = "app")]
    AppBundle,

    /// macOS DMG disk image (.dmg) holding the application bundles.
    Dmg,

    /// Windows Installer package (.msi) built with WiX.
    Msi,
}

impl PackageType {
    /// Returns the short name for this package type.
    pub fn short_name(&self) -> &'static str {
        match self {
            PackageType::AppBundle => "app",
            PackageType::Dmg => "dmg",
            PackageType::Msi => "msi",
        }
    }

    /// Returns the priority for bundling order. Lower numbers go first.
    pub fn priority(&self) -> u32 {
        match self {
            PackageType::AppBundle => 0,
            PackageType::Msi => 0,
            PackageType::Dmg => 1,
        }
    }

    /// Returns all package types available on the current platform.
    ///
    /// - **macOS**: `[AppBundle, Dmg]`
    /// - **Windows**: `[Msi]`
    /// - **Other**: `[AppBundle]`
    pub fn all_for_current_platform() -> Vec<PackageType> {
        #[cfg(target_os = "macos")]
        {
            vec![PackageType::AppBundle, PackageType::Dmg]
        }
        #[cfg(target_os = "windows")]
        {
            vec![PackageType::Msi]
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            vec![PackageType::AppBundle]
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for PackageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "app" | "bundle" => Ok(PackageType::AppBundle),
            "dmg" => Ok(PackageType::Dmg),
            "msi" => Ok(PackageType::Msi),
            other => Err(format!("unknown package type '{other}' (expected app, dmg or msi)")),
        }
    }
}
