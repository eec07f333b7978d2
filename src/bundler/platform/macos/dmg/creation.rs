//! Disk image creation with `hdiutil`.
//!
//! Customization needs a writable image, so images are created as UDRW,
//! laid out, and then converted to compressed read-only UDZO. Changes to a
//! mounted UDZO image would go to a shadow file and be lost on detach.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    time::Duration,
};

const MOUNT_RETRIES: u32 = 10;

/// Creates an image of `format` from the contents of `source_dir`.
///
/// An existing image at `output` is replaced.
pub async fn create_image(
    source_dir: &Path,
    volume_name: &str,
    output: &Path,
    format: &str,
) -> Result<()> {
    remove_stale(output).await?;

    log::info!("Creating {} image {}", format, output.display());
    hdiutil([
        OsStr::new("create"),
        OsStr::new("-volname"),
        OsStr::new(volume_name),
        OsStr::new("-srcfolder"),
        source_dir.as_os_str(),
        OsStr::new("-ov"),
        OsStr::new("-format"),
        OsStr::new(format),
        output.as_os_str(),
    ])
    .await
}

/// Converts the writable image at `writable` to UDZO at `output`.
pub async fn convert_to_compressed(writable: &Path, output: &Path) -> Result<()> {
    remove_stale(output).await?;

    log::info!("Converting DMG to compressed format...");
    hdiutil([
        OsStr::new("convert"),
        writable.as_os_str(),
        OsStr::new("-format"),
        OsStr::new("UDZO"),
        OsStr::new("-o"),
        output.as_os_str(),
    ])
    .await?;

    tokio::fs::remove_file(writable)
        .await
        .fs_context("removing writable image", writable)?;
    Ok(())
}

/// Mounts `image` read-write and waits for `/Volumes/<volume_name>`.
pub async fn attach(image: &Path, volume_name: &str) -> Result<PathBuf> {
    hdiutil([
        OsStr::new("attach"),
        image.as_os_str(),
        OsStr::new("-readwrite"),
        OsStr::new("-noverify"),
        OsStr::new("-noautoopen"),
    ])
    .await?;

    let mount_point = PathBuf::from("/Volumes").join(volume_name);
    for _ in 0..MOUNT_RETRIES {
        if mount_point.exists() {
            log::debug!("Image mounted at {}", mount_point.display());
            return Ok(mount_point);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Err(Error::GenericError(format!(
        "mount point {} not found after {} retries",
        mount_point.display(),
        MOUNT_RETRIES
    )))
}

/// Unmounts `mount_point`, forcing the detach if the first attempt fails.
pub async fn detach(mount_point: &Path) -> Result<()> {
    if let Err(e) = hdiutil([OsStr::new("detach"), mount_point.as_os_str()]).await {
        log::warn!("Detach failed, forcing: {}", e);
        hdiutil([
            OsStr::new("detach"),
            mount_point.as_os_str(),
            OsStr::new("-force"),
        ])
        .await?;
    }
    Ok(())
}

async fn hdiutil<const N: usize>(args: [&OsStr; N]) -> Result<()> {
    let output = tokio::process::Command::new("hdiutil")
        .args(args)
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            command: "hdiutil".to_string(),
            error,
        })?;

    if !output.status.success() {
        return Err(Error::GenericError(format!(
            "hdiutil {} failed: {}",
            args[0].to_string_lossy(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

async fn remove_stale(path: &Path) -> Result<()> {
    if path.exists() {
        tokio::fs::remove_file(path)
            .await
            .fs_context("removing old disk image", path)?;
    }
    Ok(())
}
