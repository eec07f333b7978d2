//! Staged assembly of application bundles.
//!
//! Every application runs through the same strictly ordered stages:
//!
//! ```text
//! Prepare -> ConfigureDocumentTypes -> Finish -> CopySupportingFiles -> [Sign]
//! ```
//!
//! The first failing stage aborts the remaining stages of that application
//! and is reported as [`Error::Stage`]. Sibling applications write disjoint
//! bundle directories and are still assembled.

mod context;
mod stages;

pub use context::{BundleLayout, MACOS_APP_LAYOUT, PlatformContext};
pub use stages::{
    BundleState, DocumentIcon, configure_document_types, copy_supporting_files, finish, prepare,
    sign,
};

use crate::bundler::{
    builder::BundleSigner,
    error::{Error, Result},
    resources::ImageFactory,
    settings::{ApplicationDescription, SetupDescription},
};
use std::{collections::HashMap, fmt, path::PathBuf};

/// One stage of the bundle pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Resolve the application and decide on a launcher.
    Prepare,
    /// Add document type declarations to the manifest.
    ConfigureDocumentTypes,
    /// Write the manifest.
    Finish,
    /// Copy executable, icons and resources.
    CopySupportingFiles,
    /// Sign the bundle, if a signer is configured.
    Sign,
}

impl Stage {
    /// Stages in execution order.
    pub const ORDER: [Stage; 5] = [
        Stage::Prepare,
        Stage::ConfigureDocumentTypes,
        Stage::Finish,
        Stage::CopySupportingFiles,
        Stage::Sign,
    ];

    /// The stage that runs after this one.
    pub fn next(self) -> Option<Stage> {
        let index = Self::ORDER.iter().position(|stage| *stage == self)?;
        Self::ORDER.get(index + 1).copied()
    }

    fn name(self) -> &'static str {
        match self {
            Stage::Prepare => "prepare",
            Stage::ConfigureDocumentTypes => "configure-document-types",
            Stage::Finish => "finish",
            Stage::CopySupportingFiles => "copy-supporting-files",
            Stage::Sign => "sign",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bundle that went through every stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledBundle {
    /// Display name of the application.
    pub application: String,
    /// Root of the bundle directory.
    pub path: PathBuf,
    /// Whether the sign stage ran.
    pub signed: bool,
}

/// Result of the pipeline for one application.
#[derive(Debug)]
pub struct ApplicationOutcome {
    /// Display name of the application.
    pub application: String,
    /// The assembled bundle, or the stage failure.
    pub result: Result<AssembledBundle>,
}

/// Runs every stage for one application.
///
/// # Errors
///
/// [`Error::Stage`] naming the failing stage and application. A signing
/// failure leaves the assembled bundle on disk.
pub async fn run_application_pipeline(
    ctx: &PlatformContext,
    setup: &SetupDescription,
    app: &ApplicationDescription,
    factory: &dyn ImageFactory,
    signer: Option<&dyn BundleSigner>,
) -> Result<AssembledBundle> {
    let name = app.display_name(setup).to_string();
    let at = |stage: Stage| {
        let application = name.clone();
        move |source: Error| Error::Stage {
            stage,
            application,
            source: Box::new(source),
        }
    };

    log::info!("Assembling {} bundle for '{}'", ctx.package_type, name);

    let mut state = prepare(ctx, setup, app).map_err(at(Stage::Prepare))?;
    configure_document_types(&mut state, setup).map_err(at(Stage::ConfigureDocumentTypes))?;
    finish(&mut state, ctx).map_err(at(Stage::Finish))?;
    copy_supporting_files(&mut state, ctx, setup, factory)
        .await
        .map_err(at(Stage::CopySupportingFiles))?;

    let signed = match signer {
        Some(signer) => {
            sign(&mut state, signer).await.map_err(at(Stage::Sign))?;
            true
        }
        None => false,
    };

    log::info!("✓ Assembled {}", state.bundle_dir.display());

    Ok(AssembledBundle {
        application: name,
        path: state.bundle_dir,
        signed,
    })
}

/// Runs the pipeline for every application in declaration order.
///
/// A failing application does not stop its siblings.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`] before any stage runs when two
/// applications would share a bundle directory.
pub async fn assemble_applications(
    ctx: &PlatformContext,
    setup: &SetupDescription,
    applications: &[ApplicationDescription],
    factory: &dyn ImageFactory,
    signer: Option<&dyn BundleSigner>,
) -> Result<Vec<ApplicationOutcome>> {
    ensure_distinct_bundles(ctx, setup, applications)?;

    let mut outcomes = Vec::with_capacity(applications.len());

    for app in applications {
        let result = run_application_pipeline(ctx, setup, app, factory, signer).await;
        if let Err(e) = &result {
            log::error!("{}", e);
        }
        outcomes.push(ApplicationOutcome {
            application: app.display_name(setup).to_string(),
            result,
        });
    }

    Ok(outcomes)
}

/// Rejects applications whose bundle directories collide.
///
/// Names are compared case-insensitively since macOS volumes usually are.
fn ensure_distinct_bundles(
    ctx: &PlatformContext,
    setup: &SetupDescription,
    applications: &[ApplicationDescription],
) -> Result<()> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (index, app) in applications.iter().enumerate() {
        let bundle_dir = ctx.bundle_dir(app.display_name(setup));
        let key = bundle_dir.to_string_lossy().to_lowercase();
        if let Some(&first) = seen.get(&key) {
            return Err(Error::InvalidConfiguration(format!(
                "applications #{} ('{}') and #{} ('{}') both bundle into {}; give them distinct display names",
                first + 1,
                applications[first].display_name(setup),
                index + 1,
                app.display_name(setup),
                bundle_dir.display()
            )));
        }
        seen.insert(key, index);
    }

    Ok(())
}

/// Collects the bundles of a complete run.
///
/// # Errors
///
/// [`Error::ApplicationsFailed`] listing every failed application.
pub fn into_bundles(outcomes: Vec<ApplicationOutcome>) -> Result<Vec<AssembledBundle>> {
    let mut bundles = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome.result {
            Ok(bundle) => bundles.push(bundle),
            Err(e) => failures.push(e.to_string()),
        }
    }

    if failures.is_empty() {
        Ok(bundles)
    } else {
        Err(Error::ApplicationsFailed { failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::Prepare.next(), Some(Stage::ConfigureDocumentTypes));
        assert_eq!(Stage::CopySupportingFiles.next(), Some(Stage::Sign));
        assert_eq!(Stage::Sign.next(), None);
    }

    #[test]
    fn test_stage_error_names_stage_and_application() {
        let err = Error::Stage {
            stage: Stage::Finish,
            application: "Demo".into(),
            source: Box::new(Error::GenericError("disk full".into())),
        };
        assert_eq!(
            err.to_string(),
            "stage finish failed for application 'Demo': disk full"
        );
    }
}
