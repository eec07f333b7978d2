//! Windows targets.
//!
//! - `msi` - Windows Installer packages compiled with the WiX toolset

pub mod msi;
