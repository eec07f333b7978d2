//! WiX compilation.
//!
//! `candle` compiles the WiX source into an object file, `light` links it
//! into the package with the localization documents of one culture.

use super::localization::LanguagePlan;
use crate::bundler::{
    error::{Error, ErrorExt, Result},
    settings::Arch,
};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Compiles `wxs` into `<work_dir>/main.wixobj`.
pub async fn run_candle(wxs: &Path, work_dir: &Path, arch: Arch) -> Result<PathBuf> {
    let object = work_dir.join("main.wixobj");

    let mut args: Vec<OsString> = vec![
        "-nologo".into(),
        "-arch".into(),
        arch.wix_platform().into(),
        "-out".into(),
    ];
    args.push(object.clone().into_os_string());
    args.push(wxs.as_os_str().to_owned());

    run_tool("candle", &args).await?;
    Ok(object)
}

/// Links `object` into the package at `output` for one language.
pub async fn run_light(object: &Path, language: &LanguagePlan, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating installer output directory", parent)?;
    }

    run_tool("light", &light_args(object, language, output)).await
}

/// Arguments of `light` for one language.
pub fn light_args(object: &Path, language: &LanguagePlan, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-nologo".into(),
        "-ext".into(),
        "WixUIExtension".into(),
        format!("-cultures:{}", language.locale.culture).into(),
    ];

    if let Some(localization) = &language.localization {
        args.push("-loc".into());
        args.push(localization.clone().into_os_string());
    }
    if let Some(license) = &language.license {
        let mut define = OsString::from("-dWixUILicenseRtf=");
        define.push(license);
        args.push(define);
    }

    args.push("-out".into());
    args.push(output.as_os_str().to_owned());
    args.push(object.as_os_str().to_owned());
    args
}

async fn run_tool(tool: &str, args: &[OsString]) -> Result<()> {
    log::info!("Running {}...", tool);
    log::debug!("{} {:?}", tool, args);

    let output = tokio::process::Command::new(tool)
        .args(args)
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: tool.to_string(),
            error,
        })?;

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GenericError(format!(
            "{} failed: {}{}",
            tool,
            stdout.trim(),
            stderr.trim()
        )));
    }

    Ok(())
}
