//! External tool detection and availability checking.
//!
//! Each check runs once per process; missing tools are reported when the
//! package type that needs them is requested.

use std::sync::LazyLock;

/// `hdiutil` creates and converts disk images.
pub static HAS_HDIUTIL: LazyLock<bool> = LazyLock::new(|| detect("hdiutil"));

/// `codesign` signs bundles and images.
pub static HAS_CODESIGN: LazyLock<bool> = LazyLock::new(|| detect("codesign"));

/// `candle` compiles WiX sources.
pub static HAS_CANDLE: LazyLock<bool> = LazyLock::new(|| detect("candle"));

/// `light` links WiX objects into an MSI.
pub static HAS_LIGHT: LazyLock<bool> = LazyLock::new(|| detect("light"));

fn detect(tool: &str) -> bool {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            true
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            false
        }
    }
}

/// Returns the first required tool that is missing.
pub fn missing_tool(tools: &[(&'static str, &LazyLock<bool>)]) -> Option<&'static str> {
    tools
        .iter()
        .find(|(_, available)| !***available)
        .map(|(name, _)| *name)
}
