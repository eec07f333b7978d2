//! CPU architecture types and utilities.

/// CPU architecture of the packaged executables.
///
/// Only used by the MSI target, which records the platform in the package.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// x86_64 / AMD64 (64-bit)
    X86_64,
    /// x86 / i686 (32-bit)
    X86,
    /// AArch64 / ARM64 (64-bit)
    AArch64,
}

impl Arch {
    /// Architecture of the running host; unknown hosts map to x86_64.
    pub fn current() -> Self {
        match std::env::consts::ARCH {
            "x86" => Arch::X86,
            "aarch64" => Arch::AArch64,
            _ => Arch::X86_64,
        }
    }

    /// WiX `-arch` value.
    pub fn wix_platform(self) -> &'static str {
        match self {
            Arch::X86_64 => "x64",
            Arch::X86 => "x86",
            Arch::AArch64 => "arm64",
        }
    }

    /// Program files folder the product installs into.
    pub fn program_files_folder(self) -> &'static str {
        match self {
            Arch::X86 => "ProgramFilesFolder",
            Arch::X86_64 | Arch::AArch64 => "ProgramFiles64Folder",
        }
    }
}
