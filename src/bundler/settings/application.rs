//! Per-application descriptions and their fallback to the setup.

use super::{DocumentType, SetupDescription};
use crate::bundler::{
    error::Result,
    resources::{IconKind, IconSet, ImageFactory},
};
use std::path::{Path, PathBuf};

/// One launchable entry point of a setup.
///
/// Getters that have a setup-wide equivalent take the [`SetupDescription`]
/// explicitly and return the local value if set, the setup's value
/// otherwise. Nothing is cached, so the result always reflects the current
/// state of both levels. Launch arguments and document types belong to the
/// application alone and are never inherited.
///
/// The executable has no setup-wide equivalent; its fallback is applied when
/// the bundle is prepared.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ApplicationDescription {
    display_name: Option<String>,
    executable: Option<String>,
    main_archive: Option<PathBuf>,
    main_class: Option<String>,
    description: Option<String>,
    work_dir: Option<String>,
    start_arguments: Option<String>,
    vm_arguments: Vec<String>,
    icons: Option<IconSet>,
    document_types: Vec<DocumentType>,
}

impl ApplicationDescription {
    /// Creates an application with no local values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Display name, falling back to the setup's application name.
    pub fn display_name<'a>(&'a self, setup: &'a SetupDescription) -> &'a str {
        self.display_name
            .as_deref()
            .unwrap_or_else(|| setup.application())
    }

    /// Description, falling back to the setup's description.
    pub fn description<'a>(&'a self, setup: &'a SetupDescription) -> Option<&'a str> {
        self.description.as_deref().or_else(|| setup.description())
    }

    /// Main archive, falling back to the setup's main archive.
    pub fn main_archive<'a>(&'a self, setup: &'a SetupDescription) -> Option<&'a Path> {
        self.main_archive.as_deref().or_else(|| setup.main_archive())
    }

    /// Main class, falling back to the setup's main class.
    pub fn main_class<'a>(&'a self, setup: &'a SetupDescription) -> Option<&'a str> {
        self.main_class.as_deref().or_else(|| setup.main_class())
    }

    /// Icon set, falling back to the setup's icons.
    pub fn icons<'a>(&'a self, setup: &'a SetupDescription) -> Option<&'a IconSet> {
        self.icons.as_ref().or_else(|| setup.icons())
    }

    /// Locally configured executable name, without fallback.
    pub fn executable(&self) -> Option<&str> {
        self.executable.as_deref()
    }

    /// Working directory of the launched process.
    pub fn work_dir(&self) -> Option<&str> {
        self.work_dir.as_deref()
    }

    /// Program arguments, empty when unset.
    pub fn start_arguments(&self) -> &str {
        self.start_arguments.as_deref().unwrap_or_default()
    }

    /// Runtime arguments in declaration order.
    pub fn vm_arguments(&self) -> &[String] {
        &self.vm_arguments
    }

    /// Document types in declaration order.
    pub fn document_types(&self) -> &[DocumentType] {
        &self.document_types
    }

    /// Writes the application's icon in the format of `kind` into `build_dir`.
    ///
    /// Returns `Ok(None)` when neither the application nor the setup has
    /// icons. Every call converts again.
    ///
    /// # Errors
    ///
    /// Propagates conversion and I/O failures of `factory` unchanged.
    pub fn icon_for_type(
        &self,
        setup: &SetupDescription,
        build_dir: &Path,
        kind: IconKind,
        factory: &dyn ImageFactory,
    ) -> Result<Option<PathBuf>> {
        match self.icons(setup) {
            Some(icons) if !icons.is_empty() => {
                let icons = icons.resolved_against(setup.project_dir());
                factory.image_file(&icons, build_dir, kind).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Snapshots the effective values against `setup`.
    ///
    /// The executable falls back to the setup's app identifier.
    pub fn resolve(&self, setup: &SetupDescription) -> ResolvedApplication {
        ResolvedApplication {
            display_name: self.display_name(setup).to_string(),
            executable: self
                .executable()
                .unwrap_or_else(|| setup.app_identifier())
                .to_string(),
            description: self.description(setup).map(str::to_string),
            main_archive: self.main_archive(setup).map(|p| setup.resolve_path(p)),
            main_class: self.main_class(setup).map(str::to_string),
            work_dir: self.work_dir.clone(),
            start_arguments: self.start_arguments().to_string(),
            vm_arguments: self.vm_arguments.clone(),
            icons: self.icons(setup).cloned(),
            document_types: self.document_types.clone(),
        }
    }

    /// Overrides the setup's application name. `None` inherits it.
    pub fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
    }

    /// Sets the executable file name.
    pub fn set_executable(&mut self, executable: Option<String>) {
        self.executable = executable;
    }

    /// Overrides the setup's main archive.
    pub fn set_main_archive(&mut self, main_archive: Option<PathBuf>) {
        self.main_archive = main_archive;
    }

    /// Overrides the setup's main class.
    pub fn set_main_class(&mut self, main_class: Option<String>) {
        self.main_class = main_class;
    }

    /// Overrides the setup's description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Sets the working directory of the started process.
    pub fn set_work_dir(&mut self, work_dir: Option<String>) {
        self.work_dir = work_dir;
    }

    /// Sets the arguments passed to the application on start.
    pub fn set_start_arguments(&mut self, start_arguments: Option<String>) {
        self.start_arguments = start_arguments;
    }

    /// Overrides the setup's icon set.
    pub fn set_icons(&mut self, icons: Option<IconSet>) {
        self.icons = icons;
    }

    /// Appends a runtime launcher option.
    pub fn add_vm_argument(&mut self, argument: impl Into<String>) {
        self.vm_arguments.push(argument.into());
    }

    /// Appends a document type association.
    pub fn add_document_type(&mut self, document_type: DocumentType) {
        self.document_types.push(document_type);
    }
}

/// Effective values of one application, frozen after configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedApplication {
    /// Display name, also the bundle directory name.
    pub display_name: String,
    /// Executable file name inside the bundle.
    pub executable: String,
    pub description: Option<String>,
    /// Absolute path of the main archive.
    pub main_archive: Option<PathBuf>,
    pub main_class: Option<String>,
    pub work_dir: Option<String>,
    pub start_arguments: String,
    pub vm_arguments: Vec<String>,
    pub icons: Option<IconSet>,
    pub document_types: Vec<DocumentType>,
}
