//! Command line argument parsing and validation.

use crate::bundler::PackageType;
use clap::Parser;
use std::path::PathBuf;

/// Installer setup builder
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_setup",
    version,
    about = "Installer setup builder for macOS app bundles, disk images and Windows MSI packages",
    long_about = "Builds installer artifacts from a declarative setup.toml.

Usage:
  kodegen_bundler_setup --config setup.toml
  kodegen_bundler_setup --config setup.toml --platform app --platform dmg
  kodegen_bundler_setup --config installer/setup.toml --platform msi --report artifacts.json

Exit code 0 = every requested artifact was produced."
)]
pub struct Args {
    /// Path to the setup description
    #[arg(short, long, value_name = "FILE", default_value = "setup.toml")]
    pub config: PathBuf,

    /// Package types to build: app, dmg, msi (default: host platform types)
    #[arg(short, long, value_name = "PLATFORM")]
    pub platform: Vec<PackageType>,

    /// Directory receiving the artifacts (overrides destination_dir)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Localization cache directory (default: <build_dir>/i18n)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Write a JSON summary of the artifacts to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.config.is_file() {
            return Err(format!(
                "Setup file not found: {}",
                self.config.display()
            ));
        }

        if let Some(report) = self.report.as_ref().filter(|r| r.is_dir()) {
            return Err(format!("Report path is a directory: {}", report.display()));
        }

        Ok(())
    }

    /// Log filter matching the verbosity flags.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platforms() {
        let args = Args::parse_from([
            "kodegen_bundler_setup",
            "--config",
            "setup.toml",
            "--platform",
            "app",
            "--platform",
            "msi",
        ]);
        assert_eq!(args.platform, vec![PackageType::AppBundle, PackageType::Msi]);
        assert_eq!(args.log_filter(), "info");
    }

    #[test]
    fn test_rejects_unknown_platform() {
        let result =
            Args::try_parse_from(["kodegen_bundler_setup", "--platform", "deb"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Args::try_parse_from(["kodegen_bundler_setup", "-v", "-q"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_missing_config() {
        let args = Args::parse_from(["kodegen_bundler_setup", "--config", "/nonexistent/setup.toml"]);
        assert!(args.validate().is_err());
    }
}
