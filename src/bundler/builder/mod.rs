//! Bundle orchestration and coordination.
//!
//! The [`Bundler`] orchestrator:
//! 1. Reads configuration from [`Settings`](crate::bundler::Settings)
//! 2. Determines which package types to create
//! 3. Delegates to platform-specific modules
//! 4. Calculates checksums and sizes
//! 5. Returns [`BundledArtifact`](crate::bundler::BundledArtifact) results
//!
//! # Module Organization
//!
//! - `checksum` - SHA-256 checksum calculation for artifacts
//! - `orchestrator` - Main [`Bundler`] struct and bundling operations
//! - `signing` - [`BundleSigner`] and the `codesign` implementation
//! - `tool_detection` - External tool availability checking

mod checksum;
mod orchestrator;
mod signing;
mod tool_detection;

pub use checksum::calculate_sha256;
pub use orchestrator::Bundler;
pub use signing::{BundleSigner, CodesignSigner};
