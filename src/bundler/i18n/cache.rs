//! On-disk cache of generated localization documents.
//!
//! Documents are content addressed: the file name carries a digest of the
//! source path, the source bytes, the locale and both rendering flags, so an
//! unchanged input is rendered once and reused on every later build.

use super::{
    locale::LocaleDescriptor,
    properties,
    resource::{LocalizedResource, find_by_locale},
    wxl,
};
use crate::bundler::{
    error::{ErrorExt, Result},
    settings::SetupDescription,
};
use sha2::{Digest, Sha256};
use std::{
    borrow::Cow,
    collections::HashMap,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

/// Materializes localized resources into `.wxl` documents.
///
/// The cache directory may be shared between builds. Concurrent callers
/// asking for the same document are serialized.
#[derive(Debug)]
pub struct LocalizationCache {
    dir: PathBuf,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl LocalizationCache {
    /// Creates a cache rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the localization document for `entry`.
    ///
    /// Returns `None` when the entry has no source, or when reading the
    /// source or writing the document fails. A missing document is not
    /// fatal; failures are logged as warnings.
    pub fn materialize(
        &self,
        entry: &LocalizedResource,
        setup: &SetupDescription,
    ) -> Option<PathBuf> {
        let source = entry.source_file(setup)?;

        let content = match std::fs::read(&source) {
            Ok(content) => content,
            Err(e) => {
                log::warn!(
                    "Skipping localization {}: cannot read {}: {}",
                    entry.locale,
                    source.display(),
                    e
                );
                return None;
            }
        };

        let is_default = entry.is_default_language(setup);
        let target = self.dir.join(cache_file_name(
            &source,
            &content,
            entry.locale,
            is_default,
            entry.overridable,
        ));

        let lock = self.lock_for(&target);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if target.is_file() {
            log::debug!("Reusing cached localization {}", target.display());
            return Some(target);
        }

        match self.generate(&target, &content, entry, is_default) {
            Ok(()) => {
                log::debug!(
                    "Generated localization {} from {}",
                    target.display(),
                    source.display()
                );
                Some(target)
            }
            Err(e) => {
                log::warn!(
                    "Skipping localization {}: cannot write {}: {}",
                    entry.locale,
                    target.display(),
                    e
                );
                None
            }
        }
    }

    /// Finds the first entry for `identifier` and materializes it.
    pub fn find_by_locale(
        &self,
        list: &[LocalizedResource],
        identifier: &str,
        setup: &SetupDescription,
    ) -> Option<PathBuf> {
        find_by_locale(list, identifier).and_then(|entry| self.materialize(entry, setup))
    }

    fn generate(
        &self,
        target: &Path,
        content: &[u8],
        entry: &LocalizedResource,
        is_default: bool,
    ) -> Result<()> {
        let text = decode(content);
        let strings = properties::parse(&text);
        let culture = (!is_default).then_some(entry.locale.culture);
        let document = wxl::render(culture, &strings, is_default || entry.overridable)?;

        std::fs::create_dir_all(&self.dir).fs_context("creating localization cache", &self.dir)?;

        let mut file = tempfile::NamedTempFile::new_in(&self.dir)
            .fs_context("creating temporary localization file", &self.dir)?;
        file.write_all(document.as_bytes())
            .fs_context("writing localization document", file.path().to_path_buf())?;

        match file.persist_noclobber(target) {
            Ok(_) => Ok(()),
            // Same key, same content: another process got there first.
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e.error).fs_context("persisting localization document", target),
        }
    }

    fn lock_for(&self, target: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(target.to_path_buf()).or_default())
    }
}

/// Translation files are UTF-8; anything else is read as ISO-8859-1.
fn decode(content: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(content) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(content.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Builds `<input name>.<digest>.wxl`.
fn cache_file_name(
    source: &Path,
    content: &[u8],
    locale: &LocaleDescriptor,
    is_default: bool,
    overridable: bool,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_os_str().as_encoded_bytes());
    hasher.update([0]);
    hasher.update(content);
    hasher.update([0]);
    hasher.update(locale.language_id.as_bytes());
    hasher.update([u8::from(is_default), u8::from(overridable)]);
    let digest = hasher.finalize();

    let name = source
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or(Cow::Borrowed("resource"));

    format!("{}.{}.wxl", name, hex::encode(&digest[..8]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::i18n::resolve_locale;

    #[test]
    fn test_cache_key_is_stable() {
        let en = resolve_locale("en").unwrap();
        let a = cache_file_name(Path::new("/p/messages.properties"), b"k=v", en, true, false);
        let b = cache_file_name(Path::new("/p/messages.properties"), b"k=v", en, true, false);
        assert_eq!(a, b);
        assert!(a.starts_with("messages.properties."));
        assert!(a.ends_with(".wxl"));
        assert_eq!(a.len(), "messages.properties.".len() + 16 + ".wxl".len());
    }

    #[test]
    fn test_cache_key_tracks_inputs() {
        let en = resolve_locale("en").unwrap();
        let de = resolve_locale("de").unwrap();
        let path = Path::new("/p/messages.properties");
        let base = cache_file_name(path, b"k=v", en, true, false);

        assert_ne!(base, cache_file_name(path, b"k=w", en, true, false));
        assert_ne!(base, cache_file_name(path, b"k=v", de, true, false));
        assert_ne!(base, cache_file_name(path, b"k=v", en, false, false));
        assert_ne!(base, cache_file_name(path, b"k=v", en, true, true));
        assert_ne!(
            base,
            cache_file_name(Path::new("/q/messages.properties"), b"k=v", en, true, false)
        );
    }

    #[test]
    fn test_decode_falls_back_to_latin1() {
        assert_eq!(decode("grüß".as_bytes()), "grüß");
        assert_eq!(decode(&[b'g', 0xFC]), "gü");
    }
}
