//! WiX source generation.
//!
//! Renders the WiX template with the setup metadata. Product, upgrade and
//! component codes are derived from the app identifier, so rebuilding the
//! same setup yields the same codes.

use super::template::WXS_TEMPLATE;
use crate::bundler::{
    error::{Error, ErrorExt, Result},
    i18n::{LocaleDescriptor, escape_xml},
    settings::{MsiSettings, Settings, SetupDescription},
};
use handlebars::Handlebars;
use serde::Serialize;
use std::{
    io,
    path::{Path, PathBuf},
};
use uuid::Uuid;

/// Deterministic Windows Installer codes of one setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductCodes {
    /// Shared by every version; ties upgrades together.
    pub upgrade: Uuid,
    /// Changes with the version.
    pub product: Uuid,
}

impl ProductCodes {
    /// Derives the codes from the app identifier and version.
    ///
    /// A configured upgrade code takes precedence.
    pub fn derive(setup: &SetupDescription, msi: &MsiSettings) -> Result<Self> {
        let upgrade = match &msi.upgrade_code {
            Some(code) => Uuid::parse_str(code.trim_matches(|c| c == '{' || c == '}'))
                .map_err(|e| {
                    Error::InvalidConfiguration(format!("invalid upgrade code '{code}': {e}"))
                })?,
            None => Uuid::new_v5(&Uuid::NAMESPACE_DNS, setup.app_identifier().as_bytes()),
        };
        let product = Uuid::new_v5(&upgrade, format!("product/{}", setup.version()).as_bytes());
        Ok(Self { upgrade, product })
    }

    /// Stable component code for `name`.
    pub fn component(&self, name: &str) -> Uuid {
        Uuid::new_v5(&self.upgrade, format!("component/{name}").as_bytes())
    }
}

/// An additional file installed next to an executable.
#[derive(Clone, Debug, Serialize)]
pub struct WxsFile {
    id: String,
    source: String,
    name: String,
}

/// One application: component, executable and shortcut.
#[derive(Clone, Debug, Serialize)]
pub struct WxsApplication {
    component_id: String,
    guid: String,
    file_id: String,
    source: String,
    file_name: String,
    shortcut_id: String,
    display_name: String,
    arguments: String,
    description: Option<String>,
    extra_files: Vec<WxsFile>,
}

/// Template data of one package.
#[derive(Clone, Debug, Serialize)]
pub struct WxsDocument {
    product_code: String,
    upgrade_code: String,
    product_name: String,
    manufacturer: String,
    version: String,
    description: Option<String>,
    lcid: u16,
    codepage: u16,
    platform: &'static str,
    install_scope: &'static str,
    root_folder: &'static str,
    install_dir_name: String,
    registry_key: String,
    menu_guid: String,
    icon: Option<String>,
    applications: Vec<WxsApplication>,
}

impl WxsDocument {
    /// Collects the package data for `locale`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] when an application has no executable
    /// source or the version is not a valid product version.
    pub fn new(
        settings: &Settings,
        codes: &ProductCodes,
        locale: &LocaleDescriptor,
        icon: Option<&Path>,
    ) -> Result<Self> {
        let setup = settings.setup();
        let msi = settings.msi();
        let manufacturer = setup.vendor().unwrap_or(setup.application()).to_string();

        let (install_scope, root_folder) = if msi.per_machine {
            ("perMachine", msi.arch.program_files_folder())
        } else {
            ("perUser", "LocalAppDataFolder")
        };

        Ok(Self {
            product_code: braced(codes.product),
            upgrade_code: braced(codes.upgrade),
            product_name: setup.application().to_string(),
            registry_key: format!("Software\\{}\\{}", manufacturer, setup.application()),
            manufacturer,
            version: product_version(setup.version())?,
            description: setup.description().map(str::to_string),
            lcid: locale.lcid,
            codepage: locale.codepage,
            platform: msi.arch.wix_platform(),
            install_scope,
            root_folder,
            install_dir_name: setup.application().to_string(),
            menu_guid: braced(codes.component("ProgramMenuDir")),
            icon: icon.map(|p| p.display().to_string()),
            applications: applications(settings, codes)?,
        })
    }

    /// Renders the WiX source.
    pub fn render(&self) -> Result<String> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(escape_xml);
        handlebars.register_template_string("main.wxs", WXS_TEMPLATE)?;
        Ok(handlebars.render("main.wxs", self)?)
    }

    /// Renders and writes the WiX source to `path`.
    pub async fn write(&self, path: &Path) -> Result<()> {
        let content = self.render()?;
        tokio::fs::write(path, content)
            .await
            .fs_context("writing WiX source", path)
    }
}

fn applications(settings: &Settings, codes: &ProductCodes) -> Result<Vec<WxsApplication>> {
    let setup = settings.setup();
    let uses_launcher = setup.runtime_launcher_name().is_some();
    let mut installed_archives: Vec<String> = Vec::new();
    let mut entries = Vec::with_capacity(settings.applications().len());

    for (index, app) in settings.applications().iter().enumerate() {
        let resolved = app.resolve(setup);
        let file_name = executable_file_name(&resolved.executable);
        let source = executable_source(setup, &file_name, &resolved.display_name)?;

        let mut extra_files = Vec::new();
        if uses_launcher {
            let archive = resolved.main_archive.as_deref().ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "application '{}' has no main archive",
                    resolved.display_name
                ))
            })?;
            let name = archive
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    Error::InvalidConfiguration(format!(
                        "invalid main archive {}",
                        archive.display()
                    ))
                })?;
            if !installed_archives.contains(&name) {
                extra_files.push(WxsFile {
                    id: format!("Archive{index}"),
                    source: archive.display().to_string(),
                    name: name.clone(),
                });
                installed_archives.push(name);
            }
        }

        entries.push(WxsApplication {
            component_id: format!("Application{index}"),
            guid: braced(codes.component(&file_name)),
            file_id: format!("Executable{index}"),
            source: source.display().to_string(),
            file_name,
            shortcut_id: format!("Shortcut{index}"),
            display_name: resolved.display_name,
            arguments: resolved.start_arguments,
            description: resolved.description,
            extra_files,
        });
    }

    Ok(entries)
}

fn executable_source(setup: &SetupDescription, file_name: &str, application: &str) -> Result<PathBuf> {
    let source = match (setup.launcher_path(), setup.binaries_dir()) {
        (Some(launcher), _) if setup.runtime_launcher_name().is_some() => launcher.to_path_buf(),
        (_, Some(dir)) => dir.join(file_name),
        _ => {
            return Err(Error::InvalidConfiguration(format!(
                "application '{application}' needs either a runtime launcher or a binaries_dir"
            )));
        }
    };

    if !source.is_file() {
        return Err(Error::Fs {
            context: "locating application executable",
            path: source,
            error: io::Error::from(io::ErrorKind::NotFound),
        });
    }
    Ok(source)
}

/// Executable name with the `.exe` extension.
pub fn executable_file_name(executable: &str) -> String {
    if executable.to_ascii_lowercase().ends_with(".exe") {
        executable.to_string()
    } else {
        format!("{executable}.exe")
    }
}

/// Normalizes a version to the `major.minor.build` product version.
///
/// Pre-release and build metadata suffixes are dropped, missing fields are
/// zero, and a fourth field is ignored by Windows Installer and dropped.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`] for non-numeric fields or fields out of
/// range (major and minor at most 255, build at most 65535).
pub fn product_version(version: &str) -> Result<String> {
    let core = version
        .split(['-', '+'])
        .next()
        .unwrap_or_default();
    let invalid = || Error::InvalidConfiguration(format!("invalid product version '{version}'"));

    let mut fields = [0u32; 3];
    for (slot, part) in fields.iter_mut().zip(core.split('.')) {
        *slot = part.parse().map_err(|_| invalid())?;
    }

    let [major, minor, build] = fields;
    if major > 255 || minor > 255 || build > 65535 {
        return Err(invalid());
    }
    Ok(format!("{major}.{minor}.{build}"))
}

fn braced(uuid: Uuid) -> String {
    format!("{{{}}}", uuid.hyphenated().to_string().to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_version_normalization() {
        assert_eq!(product_version("1").unwrap(), "1.0.0");
        assert_eq!(product_version("1.2").unwrap(), "1.2.0");
        assert_eq!(product_version("1.2.3").unwrap(), "1.2.3");
        assert_eq!(product_version("1.2.3.4").unwrap(), "1.2.3");
        assert_eq!(product_version("2.0.1-beta.1").unwrap(), "2.0.1");
    }

    #[test]
    fn test_product_version_rejects_invalid() {
        assert!(product_version("one.two").is_err());
        assert!(product_version("256.0.0").is_err());
        assert!(product_version("1.0.70000").is_err());
    }

    #[test]
    fn test_executable_file_name() {
        assert_eq!(executable_file_name("demo"), "demo.exe");
        assert_eq!(executable_file_name("Demo.EXE"), "Demo.EXE");
    }

    #[test]
    fn test_braced_uuid() {
        let uuid = Uuid::new_v5(&Uuid::NAMESPACE_DNS, b"demo");
        let text = braced(uuid);
        assert!(text.starts_with('{') && text.ends_with('}'));
        assert_eq!(text.len(), 38);
        assert_eq!(text, text.to_ascii_uppercase());
    }
}
