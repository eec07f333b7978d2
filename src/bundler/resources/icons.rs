//! Icon sets and conversion into platform icon formats.
//!
//! An [`IconSet`] lists source images, usually PNGs in several sizes. A
//! pre-built `.icns` or `.ico` in the set is copied as is; otherwise the
//! PNG sources are resized and encoded into the requested format.
//!
//! | Kind | Output | Sizes |
//! |------|--------|-------|
//! | [`IconKind::Icns`] | ICNS | 16, 32, 64, 128, 256, 512, 1024 |
//! | [`IconKind::Ico`] | ICO | 16, 24, 32, 48, 64, 128, 256 |
//! | [`IconKind::Png`] | PNG | 256 |
//!
//! # Icon Selection Algorithm
//!
//! For every target size the source with the smallest Manhattan distance to
//! the target wins; non-square sources are penalized by 10000.

use crate::bundler::error::{Error, ErrorExt, Result};
use icns::{IconFamily, IconType, Image as IcnsImage};
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

/// Source images of one application icon.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct IconSet {
    paths: Vec<PathBuf>,
}

impl IconSet {
    /// Creates an icon set from source paths.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Returns the source paths.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Returns whether the set has no sources.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Returns a copy with relative paths joined onto `base`.
    pub fn resolved_against(&self, base: &Path) -> Self {
        Self {
            paths: self
                .paths
                .iter()
                .map(|p| if p.is_absolute() { p.clone() } else { base.join(p) })
                .collect(),
        }
    }

    /// Returns the first source that already has the format of `kind`.
    pub fn prebuilt(&self, kind: IconKind) -> Option<&Path> {
        self.paths
            .iter()
            .find(|p| {
                p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(kind.extension()))
            })
            .map(PathBuf::as_path)
    }
}

/// Target icon format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconKind {
    /// macOS icon family.
    Icns,
    /// Windows icon directory.
    Ico,
    /// Single PNG image.
    Png,
}

impl IconKind {
    /// File extension of the format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            IconKind::Icns => "icns",
            IconKind::Ico => "ico",
            IconKind::Png => "png",
        }
    }
}

/// Converts an icon set into a file of the requested kind.
///
/// Implementations write into `build_dir` and return the written file. They
/// do not cache: every call writes, and callers tolerate redundant writes.
pub trait ImageFactory: Send + Sync {
    /// Writes `icons` as `kind` into `build_dir`.
    fn image_file(&self, icons: &IconSet, build_dir: &Path, kind: IconKind) -> Result<PathBuf>;
}

/// Default [`ImageFactory`] built on `image`, `icns` and `ico`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IconConverter;

impl ImageFactory for IconConverter {
    fn image_file(&self, icons: &IconSet, build_dir: &Path, kind: IconKind) -> Result<PathBuf> {
        std::fs::create_dir_all(build_dir).fs_context("creating icon directory", build_dir)?;

        if let Some(prebuilt) = icons.prebuilt(kind) {
            let file_name = prebuilt.file_name().ok_or(Error::IconPathError)?;
            let output = build_dir.join(file_name);
            std::fs::copy(prebuilt, &output).fs_context("copying icon", prebuilt)?;
            log::debug!("Copied prebuilt icon {}", prebuilt.display());
            return Ok(output);
        }

        let sources = load_icons(icons.paths())?;
        let output = build_dir.join(format!("icon.{}", kind.extension()));

        match kind {
            IconKind::Icns => create_icns_file(&sources, &output)?,
            IconKind::Ico => create_ico_file(&sources, &output)?,
            IconKind::Png => create_png_file(&sources, &output)?,
        }

        Ok(output)
    }
}

/// Icon metadata with dimensions.
#[derive(Debug, Clone)]
pub struct IconInfo {
    /// Path to the icon file.
    pub path: PathBuf,
    /// Icon width in pixels.
    pub width: u32,
    /// Icon height in pixels.
    pub height: u32,
}

impl IconInfo {
    /// Returns whether this icon is square.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Manhattan distance from a square target size.
    pub fn size_diff(&self, target: u32) -> u32 {
        self.width.abs_diff(target) + self.height.abs_diff(target)
    }
}

/// Reads the dimensions of every raster source.
///
/// Missing files and pre-built `.icns`/`.ico` files are skipped.
///
/// # Errors
///
/// Returns [`Error::IconPathError`] if no usable source remains.
pub fn load_icons(icon_paths: &[PathBuf]) -> Result<Vec<IconInfo>> {
    let mut icons = Vec::new();

    for path in icon_paths {
        if !path.exists() {
            log::warn!("Icon path does not exist: {}", path.display());
            continue;
        }
        if [IconKind::Icns, IconKind::Ico]
            .iter()
            .any(|kind| {
                path.extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case(kind.extension()))
            })
        {
            continue;
        }

        let (width, height) = image::image_dimensions(path)?;
        log::debug!("Loaded icon: {}x{} from {}", width, height, path.display());
        icons.push(IconInfo {
            path: path.clone(),
            width,
            height,
        });
    }

    if icons.is_empty() {
        return Err(Error::IconPathError);
    }

    Ok(icons)
}

/// Picks the best source for a target size.
pub fn find_icon_for_size(icons: &[IconInfo], target_size: u32) -> Option<&IconInfo> {
    icons.iter().min_by_key(|icon| {
        let square_penalty = if icon.is_square() { 0 } else { 10000 };
        icon.size_diff(target_size) + square_penalty
    })
}

/// Loads a source and resizes it with Lanczos3 filtering.
pub fn load_and_resize(source_path: &Path, width: u32, height: u32) -> Result<image::RgbaImage> {
    let img = image::open(source_path)?;
    Ok(img
        .resize_exact(width, height, image::imageops::FilterType::Lanczos3)
        .to_rgba8())
}

fn create_icns_file(icons: &[IconInfo], output: &Path) -> Result<()> {
    let mut family = IconFamily::new();

    let icon_types = [
        (IconType::RGBA32_16x16, 16),
        (IconType::RGBA32_16x16_2x, 32),
        (IconType::RGBA32_32x32, 32),
        (IconType::RGBA32_32x32_2x, 64),
        (IconType::RGBA32_128x128, 128),
        (IconType::RGBA32_128x128_2x, 256),
        (IconType::RGBA32_256x256, 256),
        (IconType::RGBA32_256x256_2x, 512),
        (IconType::RGBA32_512x512, 512),
        (IconType::RGBA32_512x512_2x, 1024),
    ];

    for (icon_type, size) in icon_types {
        let Some(source) = find_icon_for_size(icons, size) else {
            continue;
        };
        let rgba = load_and_resize(&source.path, size, size)?;
        let image = IcnsImage::from_data(icns::PixelFormat::RGBA, size, size, rgba.into_raw())
            .map_err(|e| Error::GenericError(format!("creating {size}px ICNS image: {e}")))?;
        family
            .add_icon_with_type(&image, icon_type)
            .map_err(|e| Error::GenericError(format!("adding {size}px ICNS image: {e}")))?;
    }

    let file = File::create(output).fs_context("creating ICNS output file", output)?;
    family
        .write(BufWriter::new(file))
        .fs_context("writing ICNS data", output)?;

    log::info!("Created ICNS file: {}", output.display());
    Ok(())
}

fn create_ico_file(icons: &[IconInfo], output: &Path) -> Result<()> {
    let mut icon_dir = IconDir::new(ResourceType::Icon);

    for size in [16, 24, 32, 48, 64, 128, 256] {
        let Some(source) = find_icon_for_size(icons, size) else {
            continue;
        };
        let rgba = load_and_resize(&source.path, size, size)?;
        let image = IconImage::from_rgba_data(size, size, rgba.into_raw());
        let entry = IconDirEntry::encode(&image).fs_context("encoding ICO image", &source.path)?;
        icon_dir.add_entry(entry);
    }

    let file = File::create(output).fs_context("creating ICO output file", output)?;
    icon_dir
        .write(BufWriter::new(file))
        .fs_context("writing ICO data", output)?;

    log::info!("Created ICO file: {}", output.display());
    Ok(())
}

fn create_png_file(icons: &[IconInfo], output: &Path) -> Result<()> {
    let source = find_icon_for_size(icons, 256).ok_or(Error::IconPathError)?;
    let size = source.width.min(source.height).min(256);
    load_and_resize(&source.path, size, size)?.save(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(width: u32, height: u32) -> IconInfo {
        IconInfo {
            path: PathBuf::from(format!("{width}x{height}.png")),
            width,
            height,
        }
    }

    #[test]
    fn test_find_icon_prefers_exact_square() {
        let icons = vec![info(32, 32), info(128, 128), info(256, 200)];
        assert_eq!(find_icon_for_size(&icons, 128).unwrap().width, 128);
        assert_eq!(find_icon_for_size(&icons, 256).unwrap().width, 128);
    }

    #[test]
    fn test_prebuilt_lookup_is_case_insensitive() {
        let set = IconSet::new(vec!["a.png".into(), "b.ICNS".into()]);
        assert_eq!(set.prebuilt(IconKind::Icns), Some(Path::new("b.ICNS")));
        assert_eq!(set.prebuilt(IconKind::Ico), None);
    }

    #[test]
    fn test_converts_png_sources() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("icon.png");
        image::RgbaImage::new(64, 64).save(&source).unwrap();
        let set = IconSet::new(vec![source]);
        let out = dir.path().join("out");

        for kind in [IconKind::Icns, IconKind::Ico, IconKind::Png] {
            let file = IconConverter.image_file(&set, &out, kind).unwrap();
            assert_eq!(file.extension().unwrap(), kind.extension());
            assert!(std::fs::metadata(&file).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_missing_sources_fail() {
        let dir = tempfile::tempdir().unwrap();
        let set = IconSet::new(vec![dir.path().join("nope.png")]);
        let err = IconConverter
            .image_file(&set, dir.path(), IconKind::Ico)
            .unwrap_err();
        assert!(matches!(err, Error::IconPathError));
    }
}
