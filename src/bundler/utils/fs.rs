//! File system utilities for bundling.
//!
//! Copies overwrite existing output: bundle directories are reused between
//! runs and may hold partial output from an earlier failed run.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Makes a symbolic link, replacing an existing link at `dst`.
#[cfg(unix)]
pub async fn symlink(src: &Path, dst: &Path) -> Result<()> {
    remove_existing(dst).await?;
    fs::symlink(src, dst)
        .await
        .fs_context("creating symbolic link", dst)
}

/// Makes a symbolic link, replacing an existing link at `dst`.
#[cfg(windows)]
pub async fn symlink(src: &Path, dst: &Path) -> Result<()> {
    remove_existing(dst).await?;
    fs::symlink_dir(src, dst)
        .await
        .fs_context("creating symbolic link", dst)
}

async fn remove_existing(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path)
            .await
            .fs_context("removing stale file", path),
        Err(_) => Ok(()),
    }
}

/// Copies a regular file, creating parent directories of the destination.
///
/// An existing destination file is overwritten.
///
/// # Errors
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        return Err(Error::Fs {
            context: "copying file",
            path: from.to_path_buf(),
            error: io::Error::new(io::ErrorKind::NotFound, "not an existing file"),
        });
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    remove_existing(to).await?;
    fs::copy(from, to).await.fs_context("copying file", from)?;
    log::debug!("Copied {} -> {}", from.display(), to.display());
    Ok(())
}

/// Recursively copies a directory, merging into an existing destination.
///
/// Preserves symlinks on Unix.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::Fs {
            context: "copying directory",
            path: from.to_path_buf(),
            error: io::Error::new(io::ErrorKind::NotFound, "not an existing directory"),
        });
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || copy_tree(&from, &to))
        .await
        .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in walkdir::WalkDir::new(from) {
        let entry = entry?;
        let dest_path = to.join(entry.path().strip_prefix(from)?);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            continue;
        }

        if std::fs::symlink_metadata(&dest_path).is_ok() {
            std::fs::remove_file(&dest_path).fs_context("removing stale file", &dest_path)?;
        }

        #[cfg(unix)]
        if entry.file_type().is_symlink() {
            let target = std::fs::read_link(entry.path())
                .fs_context("reading symbolic link", entry.path())?;
            std::os::unix::fs::symlink(&target, &dest_path)
                .fs_context("creating symbolic link", &dest_path)?;
            continue;
        }

        std::fs::copy(entry.path(), &dest_path).fs_context("copying file", entry.path())?;
    }
    Ok(())
}

/// Copies a file or directory to `to`.
pub async fn copy_path(from: &Path, to: &Path) -> Result<()> {
    if from.is_dir() {
        copy_dir(from, to).await
    } else {
        copy_file(from, to).await
    }
}

/// Expands glob patterns relative to `base`.
///
/// Patterns that match nothing are logged and skipped.
pub fn expand_globs(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let absolute = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            base.join(pattern).to_string_lossy().into_owned()
        };

        let before = paths.len();
        for entry in glob::glob(&absolute)? {
            paths.push(entry?);
        }
        if paths.len() == before {
            log::warn!("Resource pattern '{}' matched no files", pattern);
        }
    }
    Ok(paths)
}

/// Returns the total size of a file or directory tree in bytes.
pub fn total_size(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path).fs_context("reading metadata", path)?;
    if metadata.is_file() {
        return Ok(metadata.len());
    }

    let mut size = 0;
    for entry in walkdir::WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file() {
            size += entry.metadata()?.len();
        }
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copy_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("nested/dst.txt");
        std::fs::write(&src, "new").unwrap();
        std::fs::create_dir_all(dst.parent().unwrap()).unwrap();
        std::fs::write(&dst, "old").unwrap();

        copy_file(&src, &dst).await.unwrap();
        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_copy_dir_merges() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(src.join("a")).unwrap();
        std::fs::write(src.join("a/one.txt"), "1").unwrap();
        let dst = dir.path().join("dst");
        std::fs::create_dir_all(dst.join("a")).unwrap();
        std::fs::write(dst.join("a/one.txt"), "stale").unwrap();
        std::fs::write(dst.join("keep.txt"), "k").unwrap();

        copy_dir(&src, &dst).await.unwrap();
        assert_eq!(std::fs::read_to_string(dst.join("a/one.txt")).unwrap(), "1");
        assert!(dst.join("keep.txt").exists());
    }

    #[test]
    fn test_expand_globs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("c.md"), "").unwrap();

        let mut found = expand_globs(dir.path(), &["*.txt".into(), "*.none".into()]).unwrap();
        found.sort();
        assert_eq!(found, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);
    }

    #[test]
    fn test_total_size() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), [0u8; 10]).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b"), [0u8; 5]).unwrap();
        assert_eq!(total_size(dir.path()).unwrap(), 15);
    }
}
