//! Error types for setup bundling operations.
//!
//! Provides contextual error chaining, filesystem errors that carry the
//! offending path, and the domain errors raised while resolving a setup
//! description (unknown locales, incomplete applications) or while running
//! the per-application bundle pipeline.
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_setup::bundler::error::{Context, ErrorExt, Result};
//! use std::path::Path;
//!
//! fn read_table(path: &Path) -> Result<String> {
//!     let contents = std::fs::read_to_string(path)
//!         .fs_context("reading string table", path)?;
//!
//!     if contents.is_empty() {
//!         kodegen_bundler_setup::bail!("string table {} is empty", path.display());
//!     }
//!
//!     Ok(contents)
//! }
//! ```

use crate::bundler::pipeline::Stage;
use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
};
use thiserror::Error as DeriveError;

/// Errors returned by the bundler.
///
/// Configuration errors ([`Error::UnknownLocale`], [`Error::InvalidConfiguration`])
/// abort the whole artifact. Pipeline failures are wrapped in [`Error::Stage`]
/// so the failing stage and application are always named.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "reading string table")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// Child process execution error (hdiutil, candle, light, codesign).
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command that failed to execute
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Image processing error (icon conversion, resizing).
    #[error("{0}")]
    ImageError(#[from] image::ImageError),

    /// Error walking a directory tree.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// Handlebars template rendering error.
    #[error("{0}")]
    HandleBarsError(#[from] handlebars::RenderError),

    /// Handlebars template parsing error.
    #[error("{0}")]
    Template(#[from] handlebars::TemplateError),

    /// Property list (Info.plist) writing error.
    #[error("{0}")]
    Plist(#[from] plist::Error),

    /// Invalid resource glob pattern.
    #[error("{0}")]
    GlobPattern(#[from] glob::PatternError),

    /// Resource glob expansion error.
    #[error("{0}")]
    Glob(#[from] glob::GlobError),

    /// Locale identifier missing from the supported-locale table.
    #[error("unknown locale '{0}': not in the supported locale table")]
    UnknownLocale(String),

    /// Setup or application description is missing a required value.
    #[error("invalid setup configuration: {0}")]
    InvalidConfiguration(String),

    /// A pipeline stage failed for one application.
    #[error("stage {stage} failed for application '{application}': {source}")]
    Stage {
        /// The stage that failed
        stage: Stage,
        /// Display name of the application being assembled
        application: String,
        /// The underlying failure
        #[source]
        source: Box<Self>,
    },

    /// One or more applications of a setup could not be assembled.
    ///
    /// Raised after every sibling application was still processed.
    #[error("{} application(s) failed to bundle: {}", failures.len(), failures.join("; "))]
    ApplicationsFailed {
        /// One message per failed application
        failures: Vec<String>,
    },

    /// Required icon paths not found in configuration.
    #[error("could not find icon paths in setup configuration")]
    IconPathError,

    /// Application or disk image signing failed.
    #[error("failed to sign: {0}")]
    Sign(String),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Whether this error is a configuration error that aborts the whole artifact.
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Error::UnknownLocale(_) | Error::InvalidConfiguration(_) => true,
            Error::Context(_, inner) | Error::Stage { source: inner, .. } => {
                inner.is_configuration_error()
            }
            _ => false,
        }
    }
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with the bundler's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying executable".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::error::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
