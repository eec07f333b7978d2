//! Error types of the command line tool.
//!
//! Library failures arrive as [`crate::bundler::Error`] and are wrapped in
//! [`BundlerError::Bundler`].

use crate::bundler::Error as LibraryError;
use thiserror::Error;

/// Result type alias for command line operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type of the command line tool
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] LibraryError),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            BundlerError::Cli(CliError::InvalidArguments { .. }) => {
                vec!["Run with --help to see the accepted arguments".to_string()]
            }
            BundlerError::Toml(_) => {
                vec!["Check the syntax of setup.toml against the documented tables".to_string()]
            }
            BundlerError::Bundler(LibraryError::UnknownLocale(_)) => {
                vec!["Use a language id such as \"en\" or a culture tag such as \"de-DE\"".to_string()]
            }
            BundlerError::Bundler(e) if e.is_configuration_error() => {
                vec!["Fix the setup description; nothing was built for this artifact".to_string()]
            }
            BundlerError::Bundler(LibraryError::ApplicationsFailed { .. }) => {
                vec!["Sibling applications were still assembled; see the failures above".to_string()]
            }
            _ => Vec::new(),
        }
    }

    /// Whether rerunning without changing the configuration can succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            BundlerError::Cli(_) | BundlerError::Toml(_) => false,
            BundlerError::Bundler(e) => !e.is_configuration_error(),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_not_recoverable() {
        let err = BundlerError::from(LibraryError::UnknownLocale("xx".into()));
        assert!(!err.is_recoverable());
        assert_eq!(err.recovery_suggestions().len(), 1);

        let err = BundlerError::from(std::io::Error::other("disk full"));
        assert!(err.is_recoverable());
    }
}
