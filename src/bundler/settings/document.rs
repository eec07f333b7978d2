//! Document type associations.

use std::path::PathBuf;

/// Role an application plays for a document type (`CFBundleTypeRole`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentRole {
    /// Reads and writes documents of the type.
    #[default]
    Editor,
    /// Reads documents of the type.
    Viewer,
    /// Provides runtime services.
    Shell,
    /// Declares the type without handling it.
    None,
}

impl DocumentRole {
    /// Manifest value of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentRole::Editor => "Editor",
            DocumentRole::Viewer => "Viewer",
            DocumentRole::Shell => "Shell",
            DocumentRole::None => "None",
        }
    }
}

/// A file type an application opens.
///
/// ```toml
/// [[application.document_types]]
/// name = "Demo Project"
/// extensions = ["demo"]
/// mime_types = ["application/x-demo"]
/// role = "editor"
/// icon = "assets/document.icns"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub struct DocumentType {
    /// Human-readable type name.
    pub name: String,
    /// File extensions without the leading dot. At least one is required.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// MIME types of the documents.
    #[serde(default)]
    pub mime_types: Vec<String>,
    /// Handler role.
    #[serde(default)]
    pub role: DocumentRole,
    /// Document icon.
    #[serde(default)]
    pub icon: Option<PathBuf>,
}

impl DocumentType {
    /// Creates a document type with one extension and the editor role.
    pub fn new(name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extensions: vec![extension.into()],
            ..Default::default()
        }
    }
}
