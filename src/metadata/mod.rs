//! Setup description loading from `setup.toml`.
//!
//! ```toml
//! [setup]
//! application = "Demo"
//! vendor = "Demo Corp"
//! version = "1.2.0"
//! default_language = "en"
//! binaries_dir = "target/release"
//!
//! [[application]]
//! display_name = "Demo Viewer"
//! executable = "demo-viewer"
//!
//! [msi]
//! languages = ["en", "de"]
//! i18n = ["installer/messages.properties", { locale = "de", resource = "installer/messages_de.properties" }]
//! ```
//!
//! `project_dir` is relative to the directory holding `setup.toml` and
//! defaults to it. Every other relative path is resolved against
//! `project_dir`.

use crate::bundler::{
    ApplicationDescription, Arch, DmgSettings, MacOsSettings, MsiSettings, SettingsBuilder,
    SetupBuilder, SetupDescription,
    i18n::{LocalizedResource, ResourceSpec, add_localized_resource},
    resources::IconSet,
};
use crate::error::{BundlerError, CliError, Result};
use path_absolutize::Absolutize;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Everything `setup.toml` describes.
#[derive(Debug)]
pub struct SetupManifest {
    /// The setup-wide description, open for command line overrides.
    pub setup: SetupDescription,
    /// Applications in declaration order.
    pub applications: Vec<ApplicationDescription>,
    /// `[macos]` settings.
    pub macos: MacOsSettings,
    /// `[dmg]` settings.
    pub dmg: DmgSettings,
    /// `[msi]` settings.
    pub msi: MsiSettings,
}

impl SetupManifest {
    /// Hands the manifest to a settings builder.
    pub fn into_builder(self) -> SettingsBuilder {
        SettingsBuilder::new()
            .setup(self.setup)
            .applications(self.applications)
            .macos(self.macos)
            .dmg(self.dmg)
            .msi(self.msi)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetupFile {
    setup: SetupTable,
    #[serde(default)]
    application: Vec<ApplicationDescription>,
    #[serde(default)]
    macos: MacOsSettings,
    #[serde(default)]
    dmg: DmgTable,
    #[serde(default)]
    msi: MsiTable,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SetupTable {
    application: Option<String>,
    app_identifier: Option<String>,
    vendor: Option<String>,
    version: Option<String>,
    copyright: Option<String>,
    bundle_identifier: Option<String>,
    description: Option<String>,
    main_archive: Option<PathBuf>,
    main_class: Option<String>,
    icons: Option<IconSet>,
    default_language: Option<String>,
    project_dir: Option<PathBuf>,
    build_dir: Option<PathBuf>,
    destination_dir: Option<PathBuf>,
    runtime_launcher_name: Option<String>,
    launcher_path: Option<PathBuf>,
    binaries_dir: Option<PathBuf>,
    resources: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DmgTable {
    volume_name: Option<String>,
    window_width: Option<u32>,
    window_height: Option<u32>,
    icon_size: Option<u32>,
    font_size: Option<u32>,
    background: Option<PathBuf>,
    welcome_pages: Vec<LocalizedEntry>,
    conclusion_pages: Vec<LocalizedEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MsiTable {
    languages: Vec<String>,
    arch: Option<Arch>,
    i18n: Vec<LocalizedEntry>,
    license_files: Vec<LocalizedEntry>,
    upgrade_code: Option<String>,
    per_machine: Option<bool>,
}

/// A localized resource: a plain path in the default language, or a table
/// adjusting the default entry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocalizedEntry {
    Path(PathBuf),
    Table(LocalizedTable),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocalizedTable {
    locale: Option<String>,
    resource: Option<PathBuf>,
    #[serde(default)]
    overridable: bool,
}

impl LocalizedEntry {
    fn into_spec(self) -> ResourceSpec {
        match self {
            LocalizedEntry::Path(path) => ResourceSpec::Path(path),
            LocalizedEntry::Table(LocalizedTable {
                locale,
                resource,
                overridable,
            }) => ResourceSpec::configure(move |entry| {
                let mut entry = entry.with_overridable(overridable);
                if let Some(locale) = locale {
                    entry = entry.with_locale(&locale)?;
                }
                if let Some(resource) = resource {
                    entry = entry.with_resource(resource);
                }
                Ok(entry)
            }),
        }
    }
}

/// Loads and validates `setup.toml`.
///
/// # Errors
///
/// - read failures and invalid TOML
/// - a missing `[setup] application` or an unknown locale anywhere
pub fn load_manifest(path: &Path) -> Result<SetupManifest> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_setup_toml".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    let config_dir = path
        .absolutize()
        .map(|p| p.into_owned())?
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            BundlerError::Cli(CliError::InvalidArguments {
                reason: format!("Invalid setup file path: {}", path.display()),
            })
        })?;

    parse_manifest(&content, &config_dir)
}

/// Parses the content of a `setup.toml` located in `config_dir`.
pub fn parse_manifest(content: &str, config_dir: &Path) -> Result<SetupManifest> {
    let file: SetupFile = toml::from_str(content)?;

    let project_dir = match &file.setup.project_dir {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => config_dir.join(dir),
        None => config_dir.to_path_buf(),
    };

    let setup = build_setup(file.setup, &project_dir)?;
    let dmg = build_dmg(&setup, file.dmg)?;
    let msi = build_msi(&setup, file.msi)?;

    log::debug!(
        "Loaded setup '{}' with {} application(s)",
        setup.application(),
        file.application.len()
    );

    Ok(SetupManifest {
        setup,
        applications: file.application,
        macos: file.macos,
        dmg,
        msi,
    })
}

fn build_setup(table: SetupTable, project_dir: &Path) -> Result<SetupDescription> {
    let mut builder = SetupBuilder::new()
        .project_dir(project_dir)
        .resources(table.resources);

    if let Some(application) = table.application {
        builder = builder.application(application);
    }
    if let Some(value) = table.app_identifier {
        builder = builder.app_identifier(value);
    }
    if let Some(value) = table.vendor {
        builder = builder.vendor(value);
    }
    if let Some(value) = table.version {
        builder = builder.version(value);
    }
    if let Some(value) = table.copyright {
        builder = builder.copyright(value);
    }
    if let Some(value) = table.bundle_identifier {
        builder = builder.bundle_identifier(value);
    }
    if let Some(value) = table.description {
        builder = builder.description(value);
    }
    if let Some(value) = table.main_archive {
        builder = builder.main_archive(value);
    }
    if let Some(value) = table.main_class {
        builder = builder.main_class(value);
    }
    if let Some(value) = table.default_language {
        builder = builder.default_language(value);
    }
    if let Some(value) = table.build_dir {
        builder = builder.build_dir(value);
    }
    if let Some(value) = table.destination_dir {
        builder = builder.destination_dir(value);
    }
    if let Some(value) = table.runtime_launcher_name {
        builder = builder.runtime_launcher_name(value);
    }
    if let Some(value) = table.launcher_path {
        builder = builder.launcher_path(value);
    }
    if let Some(value) = table.binaries_dir {
        builder = builder.binaries_dir(value);
    }

    let icons = table
        .icons
        .or_else(|| discover_icons(project_dir));
    if let Some(icons) = icons {
        builder = builder.icons(icons);
    }

    Ok(builder.build()?)
}

fn build_dmg(setup: &SetupDescription, table: DmgTable) -> Result<DmgSettings> {
    let defaults = DmgSettings::default();
    Ok(DmgSettings {
        volume_name: table.volume_name,
        window_width: table.window_width.unwrap_or(defaults.window_width),
        window_height: table.window_height.unwrap_or(defaults.window_height),
        icon_size: table.icon_size.unwrap_or(defaults.icon_size),
        font_size: table.font_size.unwrap_or(defaults.font_size),
        background: table.background,
        welcome_pages: localized(setup, table.welcome_pages)?,
        conclusion_pages: localized(setup, table.conclusion_pages)?,
    })
}

fn build_msi(setup: &SetupDescription, table: MsiTable) -> Result<MsiSettings> {
    let defaults = MsiSettings::default();
    Ok(MsiSettings {
        languages: table.languages,
        arch: table.arch.unwrap_or(defaults.arch),
        i18n: localized(setup, table.i18n)?,
        license_files: localized(setup, table.license_files)?,
        upgrade_code: table.upgrade_code,
        per_machine: table.per_machine.unwrap_or(defaults.per_machine),
    })
}

fn localized(
    setup: &SetupDescription,
    entries: Vec<LocalizedEntry>,
) -> Result<Vec<LocalizedResource>> {
    let mut list = Vec::with_capacity(entries.len());
    for entry in entries {
        add_localized_resource(setup, &mut list, entry.into_spec())?;
    }
    Ok(list)
}

/// Discovers icons from the conventional `assets/img/` directory.
///
/// Picks up `icon.icns`, `icon.ico` and `icon_<w>x<h>[@2x].png` files.
fn discover_icons(project_dir: &Path) -> Option<IconSet> {
    let assets_dir = project_dir.join("assets").join("img");
    let entries = match std::fs::read_dir(&assets_dir) {
        Ok(entries) => entries,
        Err(_) => {
            log::debug!("No icon directory at {}", assets_dir.display());
            return None;
        }
    };

    let mut icons: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_ascii_lowercase())
                .unwrap_or_default();
            name == "icon.icns"
                || name == "icon.ico"
                || (name.starts_with("icon_") && name.ends_with(".png"))
        })
        .collect();
    icons.sort();

    if icons.is_empty() {
        log::warn!("No icon files found in {}", assets_dir.display());
        return None;
    }

    log::info!("Discovered {} icon file(s) in {}", icons.len(), assets_dir.display());
    Some(IconSet::new(icons))
}
