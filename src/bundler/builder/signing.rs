//! Code signing of assembled bundles and disk images.
//!
//! Signing is the last step of every bundle. A failed signature leaves the
//! assembled bundle on disk unsigned; nothing is rolled back.

use crate::bundler::{
    Result,
    settings::{MacOsSettings, SetupDescription},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Signs one fully assembled bundle directory or image file.
#[async_trait]
pub trait BundleSigner: Send + Sync {
    /// Signs the bundle at `bundle`.
    async fn sign_application(&self, bundle: &Path) -> Result<()>;
}

/// Signs with `codesign` through `kodegen_bundler_sign`.
///
/// Only available on macOS hosts; elsewhere every call fails with
/// [`Error::Sign`](crate::bundler::Error::Sign).
#[derive(Clone, Debug)]
pub struct CodesignSigner {
    identity: String,
    entitlements: Option<PathBuf>,
    hardened_runtime: bool,
}

impl CodesignSigner {
    /// Creates a signer for `identity`.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            entitlements: None,
            hardened_runtime: true,
        }
    }

    /// Builds a signer from the macOS settings, if an identity is configured.
    ///
    /// Relative entitlement paths are resolved against the project directory.
    pub fn from_settings(macos: &MacOsSettings, setup: &SetupDescription) -> Option<Self> {
        let identity = macos.signing_identity.as_deref()?;
        Some(Self {
            identity: identity.to_string(),
            entitlements: macos.entitlements.as_deref().map(|p| setup.resolve_path(p)),
            hardened_runtime: macos.hardened_runtime,
        })
    }

    /// Returns the signing identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

#[async_trait]
impl BundleSigner for CodesignSigner {
    #[cfg(target_os = "macos")]
    async fn sign_application(&self, bundle: &Path) -> Result<()> {
        log::info!(
            "Signing {} with identity '{}'",
            bundle.display(),
            self.identity
        );

        kodegen_bundler_sign::macos::sign_with_entitlements(
            bundle,
            &self.identity,
            self.entitlements.as_deref(),
            self.hardened_runtime,
        )
        .await
        .map_err(|e| {
            crate::bundler::Error::Sign(format!("{}: {}", bundle.display(), e))
        })?;

        log::info!("✓ Successfully signed {}", bundle.display());
        Ok(())
    }

    #[cfg(not(target_os = "macos"))]
    async fn sign_application(&self, bundle: &Path) -> Result<()> {
        Err(crate::bundler::Error::Sign(format!(
            "{}: codesign requires a macOS host (identity '{}', hardened runtime {}, entitlements {:?})",
            bundle.display(),
            self.identity,
            self.hardened_runtime,
            self.entitlements
        )))
    }
}
