//! The individual stages of the bundle pipeline.
//!
//! Each stage takes the [`BundleState`] produced by the stages before it.
//! `prepare` and `configure_document_types` only touch in-memory metadata;
//! `finish` writes the manifest once; `copy_supporting_files` fills the
//! bundle tree; `sign` hands the finished bundle to a signer.

use super::{PlatformContext, Stage};
use crate::bundler::{
    builder::BundleSigner,
    error::{Error, ErrorExt, Result},
    resources::{IconKind, IconSet, ImageFactory},
    settings::{ApplicationDescription, ResolvedApplication, SetupDescription},
    utils::fs,
};
use plist::{Dictionary, Value};
use std::path::{Path, PathBuf};

/// A document icon waiting to be converted into the bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentIcon {
    /// Source image, absolute.
    pub source: PathBuf,
    /// File name inside the resources directory.
    pub file_name: String,
}

/// Accumulated output of the pipeline for one application.
#[derive(Debug)]
pub struct BundleState {
    /// Effective application values.
    pub application: ResolvedApplication,
    /// Root of the bundle directory.
    pub bundle_dir: PathBuf,
    /// Whether a runtime launcher wraps the application.
    pub uses_launcher: bool,
    /// Launcher name recorded in the manifest.
    pub launcher_name: Option<String>,
    /// Manifest entries collected so far.
    pub manifest: Dictionary,
    /// Document icons to place into the bundle.
    pub document_icons: Vec<DocumentIcon>,
    completed: Stage,
}

impl BundleState {
    /// The last stage that completed.
    pub fn completed(&self) -> Stage {
        self.completed
    }

    fn advance(&mut self, stage: Stage) -> Result<()> {
        if self.completed.next() != Some(stage) {
            return Err(Error::GenericError(format!(
                "stage {} cannot run after {}",
                stage, self.completed
            )));
        }
        self.completed = stage;
        Ok(())
    }
}

/// Resolves the application and decides whether a launcher is used.
///
/// The executable falls back to the setup's app identifier. With a runtime
/// launcher the launcher stub, the main archive and the main class are
/// required; without one the executable is taken from the binaries
/// directory.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`] when a required value is missing.
pub fn prepare(
    ctx: &PlatformContext,
    setup: &SetupDescription,
    app: &ApplicationDescription,
) -> Result<BundleState> {
    let application = app.resolve(setup);
    let launcher_name = setup.runtime_launcher_name().map(str::to_string);
    let uses_launcher = launcher_name.is_some();

    if application.executable.trim().is_empty() {
        return Err(Error::InvalidConfiguration(format!(
            "application '{}' has no executable name",
            application.display_name
        )));
    }

    if uses_launcher {
        if setup.launcher_path().is_none() {
            return Err(Error::InvalidConfiguration(
                "a runtime launcher is configured but no launcher_path is set".into(),
            ));
        }
        if application.main_archive.is_none() {
            return Err(Error::InvalidConfiguration(format!(
                "application '{}' has no main archive",
                application.display_name
            )));
        }
        if application.main_class.is_none() {
            return Err(Error::InvalidConfiguration(format!(
                "application '{}' has no main class",
                application.display_name
            )));
        }
    } else if setup.binaries_dir().is_none() {
        return Err(Error::InvalidConfiguration(format!(
            "application '{}' needs either a runtime launcher or a binaries_dir",
            application.display_name
        )));
    }

    let manifest = base_manifest(ctx, setup, &application, launcher_name.as_deref());

    log::debug!(
        "Prepared '{}' (executable {}, launcher {})",
        application.display_name,
        application.executable,
        launcher_name.as_deref().unwrap_or("none")
    );

    Ok(BundleState {
        bundle_dir: ctx.bundle_dir(&application.display_name),
        application,
        uses_launcher,
        launcher_name,
        manifest,
        document_icons: Vec::new(),
        completed: Stage::Prepare,
    })
}

fn base_manifest(
    ctx: &PlatformContext,
    setup: &SetupDescription,
    application: &ResolvedApplication,
    launcher_name: Option<&str>,
) -> Dictionary {
    let mut plist = Dictionary::new();
    let mut set = |key: &str, value: Value| {
        plist.insert(key.to_string(), value);
    };

    set("CFBundleDevelopmentRegion", setup.default_language().into());
    set("CFBundleDisplayName", application.display_name.as_str().into());
    set("CFBundleExecutable", application.executable.as_str().into());
    set(
        "CFBundleIdentifier",
        bundle_identifier(setup, &application.executable).into(),
    );
    set("CFBundleInfoDictionaryVersion", "6.0".into());
    set("CFBundleName", application.display_name.as_str().into());
    set("CFBundlePackageType", "APPL".into());
    set("CFBundleShortVersionString", setup.version().into());
    set("CFBundleVersion", setup.version().into());
    set("NSHighResolutionCapable", true.into());

    if application.icons.as_ref().is_some_and(|icons| !icons.is_empty()) {
        set(
            "CFBundleIconFile",
            format!("{}.icns", application.executable).into(),
        );
    }
    if let Some(description) = &application.description {
        set("CFBundleGetInfoString", description.as_str().into());
    }
    if let Some(copyright) = setup.copyright() {
        set("NSHumanReadableCopyright", copyright.into());
    }
    if let Some(version) = &ctx.minimum_system_version {
        set("LSMinimumSystemVersion", version.as_str().into());
    }
    if let Some(category) = &ctx.category {
        set("LSApplicationCategoryType", category.as_str().into());
    }

    if let Some(launcher) = launcher_name {
        set("LauncherName", launcher.into());
        if let Some(class) = &application.main_class {
            set("LauncherMainClass", class.as_str().into());
        }
        if let Some(name) = application.main_archive.as_deref().and_then(Path::file_name) {
            set(
                "LauncherClassPath",
                format!("app/{}", name.to_string_lossy()).into(),
            );
        }
        set(
            "LauncherOptions",
            Value::Array(
                application
                    .vm_arguments
                    .iter()
                    .map(|arg| Value::from(arg.as_str()))
                    .collect(),
            ),
        );
        if !application.start_arguments.is_empty() {
            set(
                "LauncherArguments",
                application.start_arguments.as_str().into(),
            );
        }
    }
    if let Some(work_dir) = &application.work_dir {
        set("WorkingDirectory", work_dir.as_str().into());
    }

    plist
}

/// The setup's bundle identifier, suffixed for secondary executables.
fn bundle_identifier(setup: &SetupDescription, executable: &str) -> String {
    if executable == setup.app_identifier() {
        return setup.bundle_identifier().to_string();
    }
    let suffix: String = executable
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    format!("{}.{}", setup.bundle_identifier(), suffix)
}

/// Adds the declared document types to the manifest, in declaration order.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`] for a document type without extensions.
pub fn configure_document_types(state: &mut BundleState, setup: &SetupDescription) -> Result<()> {
    state.advance(Stage::ConfigureDocumentTypes)?;

    let mut declarations = Vec::with_capacity(state.application.document_types.len());
    let mut icons = Vec::new();

    for document in &state.application.document_types {
        if document.extensions.is_empty() {
            return Err(Error::InvalidConfiguration(format!(
                "document type '{}' of '{}' declares no extensions",
                document.name, state.application.display_name
            )));
        }

        let mut declaration = Dictionary::new();
        declaration.insert("CFBundleTypeName".into(), document.name.as_str().into());
        declaration.insert(
            "CFBundleTypeExtensions".into(),
            Value::Array(
                document
                    .extensions
                    .iter()
                    .map(|ext| Value::from(ext.trim_start_matches('.')))
                    .collect(),
            ),
        );
        if !document.mime_types.is_empty() {
            declaration.insert(
                "CFBundleTypeMIMETypes".into(),
                Value::Array(
                    document
                        .mime_types
                        .iter()
                        .map(|mime| Value::from(mime.as_str()))
                        .collect(),
                ),
            );
        }
        declaration.insert("CFBundleTypeRole".into(), document.role.as_str().into());

        if let Some(icon) = &document.icon {
            let stem = icon
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| document.name.clone());
            let file_name = format!("{stem}.icns");
            declaration.insert("CFBundleTypeIconFile".into(), file_name.as_str().into());
            icons.push(DocumentIcon {
                source: setup.resolve_path(icon),
                file_name,
            });
        }

        declarations.push(Value::Dictionary(declaration));
    }

    if !declarations.is_empty() {
        state
            .manifest
            .insert("CFBundleDocumentTypes".into(), Value::Array(declarations));
    }
    state.document_icons = icons;
    Ok(())
}

/// Writes the manifest. Runs once, after all document types are known.
pub fn finish(state: &mut BundleState, ctx: &PlatformContext) -> Result<PathBuf> {
    state.advance(Stage::Finish)?;

    let path = state.bundle_dir.join(ctx.layout.manifest);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).fs_context("creating bundle directory", parent)?;
    }

    Value::Dictionary(state.manifest.clone()).to_file_xml(&path)?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}

/// Copies the executable, icons, main archive and resources into the bundle.
///
/// Existing files from an earlier run are overwritten.
pub async fn copy_supporting_files(
    state: &mut BundleState,
    ctx: &PlatformContext,
    setup: &SetupDescription,
    factory: &dyn ImageFactory,
) -> Result<()> {
    state.advance(Stage::CopySupportingFiles)?;

    let executable_dir = state.bundle_dir.join(ctx.layout.executable_dir);
    let resources_dir = state.bundle_dir.join(ctx.layout.resources_dir);
    let app_dir = state.bundle_dir.join(ctx.layout.app_dir);
    fs::create_dir_all(&executable_dir, false).await?;
    fs::create_dir_all(&resources_dir, false).await?;

    let executable = executable_dir.join(&state.application.executable);
    let executable_source = executable_source(state, setup)?;
    fs::copy_file(&executable_source, &executable).await?;
    make_executable(&executable)?;

    let icon_dir = ctx.build_dir.join(&state.application.executable);
    if let Some(icons) = state.application.icons.as_ref().filter(|i| !i.is_empty()) {
        let icons = icons.resolved_against(setup.project_dir());
        let icns = factory.image_file(&icons, &icon_dir, IconKind::Icns)?;
        let target = resources_dir.join(format!("{}.icns", state.application.executable));
        fs::copy_file(&icns, &target).await?;
    }

    for (index, document_icon) in state.document_icons.iter().enumerate() {
        let icons = IconSet::new(vec![document_icon.source.clone()]);
        let icns = factory.image_file(
            &icons,
            &icon_dir.join(format!("document-{index}")),
            IconKind::Icns,
        )?;
        fs::copy_file(&icns, &resources_dir.join(&document_icon.file_name)).await?;
    }

    if state.uses_launcher {
        if let Some(archive) = &state.application.main_archive {
            let name = archive.file_name().ok_or_else(|| {
                Error::InvalidConfiguration(format!("invalid main archive {}", archive.display()))
            })?;
            fs::copy_file(archive, &app_dir.join(name)).await?;
        }
    }

    for resource in fs::expand_globs(setup.project_dir(), setup.resources())? {
        let Some(name) = resource.file_name() else {
            continue;
        };
        fs::copy_path(&resource, &app_dir.join(name)).await?;
    }

    log::debug!("Copied supporting files into {}", state.bundle_dir.display());
    Ok(())
}

fn executable_source(state: &BundleState, setup: &SetupDescription) -> Result<PathBuf> {
    let source = if state.uses_launcher {
        setup.launcher_path().map(Path::to_path_buf)
    } else {
        setup
            .binaries_dir()
            .map(|dir| dir.join(&state.application.executable))
    };
    source.ok_or_else(|| {
        Error::InvalidConfiguration(format!(
            "no executable source for '{}'",
            state.application.display_name
        ))
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .fs_context("setting executable permissions", path)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Signs the assembled bundle. A failure leaves the bundle unsigned on disk.
pub async fn sign(state: &mut BundleState, signer: &dyn BundleSigner) -> Result<()> {
    state.advance(Stage::Sign)?;
    signer.sign_application(&state.bundle_dir).await
}
