//! Command line interface for the setup builder.
//!
//! Loads `setup.toml`, applies the command line overrides, builds the
//! requested artifacts and reports them.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::{
    bundler::{BundledArtifact, Bundler},
    error::{BundlerError, CliError, Result},
    metadata,
};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Parse arguments without executing
pub fn parse_args() -> Args {
    Args::parse_args()
}

/// Main CLI entry point.
///
/// Returns the process exit code: 0 only if every requested artifact was
/// produced.
pub async fn run(args: Args) -> Result<i32> {
    let config = RuntimeConfig::from(&args);
    let output = config.output();

    args.validate()
        .map_err(|reason| BundlerError::Cli(CliError::InvalidArguments { reason }))?;

    let mut manifest = metadata::load_manifest(&args.config)?;
    if let Some(dir) = &args.output_dir {
        manifest.setup.set_destination_dir(absolute(dir)?);
    }

    let mut builder = manifest.into_builder();
    if !args.platform.is_empty() {
        builder = builder.package_types(args.platform.clone());
    }
    if let Some(dir) = &args.cache_dir {
        builder = builder.cache_dir(absolute(dir)?);
    }
    let settings = builder.build()?;

    output.section(&format!("Building setup for {}", settings.setup().application()))?;
    output.verbose(&format!(
        "Artifacts go to {}",
        settings.destination_dir().display()
    ))?;

    let artifacts = Bundler::new(settings).bundle().await?;
    if artifacts.is_empty() {
        output.warn("No package types were requested")?;
    }
    report_artifacts(output, &artifacts)?;

    if let Some(report) = &args.report {
        write_report(report, &artifacts)?;
        output.info(&format!("Wrote report to {}", report.display()))?;
    }

    Ok(0)
}

fn report_artifacts(output: &OutputManager, artifacts: &[BundledArtifact]) -> Result<()> {
    for artifact in artifacts {
        output.success(&format!(
            "{} ({} bytes, sha256 {})",
            artifact.package_type, artifact.size, artifact.checksum
        ))?;
        for path in &artifact.paths {
            output.indent(&path.display().to_string())?;
        }
    }
    Ok(())
}

fn write_report(path: &Path, artifacts: &[BundledArtifact]) -> Result<()> {
    let json = serde_json::to_string_pretty(artifacts)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}
