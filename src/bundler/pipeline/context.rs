//! Per-platform parameters of the bundle pipeline.

use crate::bundler::{
    platform::PackageType,
    settings::{MacOsSettings, SetupDescription},
};
use std::path::PathBuf;

/// Directory conventions of a bundle format, relative to the bundle root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BundleLayout {
    /// Extension of the bundle directory.
    pub extension: &'static str,
    /// Where the executable goes.
    pub executable_dir: &'static str,
    /// Where icons and other resources go.
    pub resources_dir: &'static str,
    /// Where the main archive and auxiliary files go.
    pub app_dir: &'static str,
    /// The manifest file.
    pub manifest: &'static str,
}

/// Layout of a macOS `.app` bundle.
pub const MACOS_APP_LAYOUT: BundleLayout = BundleLayout {
    extension: "app",
    executable_dir: "Contents/MacOS",
    resources_dir: "Contents/Resources",
    app_dir: "Contents/Resources/app",
    manifest: "Contents/Info.plist",
};

/// Everything a pipeline run needs to know about its target platform.
#[derive(Clone, Debug)]
pub struct PlatformContext {
    /// Package type the bundles are assembled for.
    pub package_type: PackageType,
    /// Directory receiving the bundle directories.
    pub output_dir: PathBuf,
    /// Scratch directory for converted icons.
    pub build_dir: PathBuf,
    /// Bundle directory conventions.
    pub layout: BundleLayout,
    /// `LSMinimumSystemVersion` written into the manifest.
    pub minimum_system_version: Option<String>,
    /// `LSApplicationCategoryType` written into the manifest.
    pub category: Option<String>,
}

impl PlatformContext {
    /// Context for macOS application bundles written to `output_dir`.
    pub fn macos_app(
        package_type: PackageType,
        output_dir: impl Into<PathBuf>,
        setup: &SetupDescription,
        macos: &MacOsSettings,
    ) -> Self {
        Self {
            package_type,
            output_dir: output_dir.into(),
            build_dir: setup.build_dir().join(package_type.short_name()),
            layout: MACOS_APP_LAYOUT,
            minimum_system_version: macos.minimum_system_version.clone(),
            category: macos.category.clone(),
        }
    }

    /// Root directory of the bundle for `display_name`.
    pub fn bundle_dir(&self, display_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", display_name, self.layout.extension))
    }
}
