#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use kodegen_bundler_setup::bundler::{
        ApplicationDescription, BundleSigner, DocumentType, Error, MacOsSettings, PackageType,
        Result, SetupBuilder, SetupDescription,
        pipeline::{
            self, PlatformContext, Stage, assemble_applications, into_bundles,
            run_application_pipeline,
        },
        resources::{IconKind, IconSet, ImageFactory},
    };
    use plist::Value;
    use std::{
        path::{Path, PathBuf},
        sync::Mutex,
    };

    /// Writes a placeholder file instead of converting images.
    struct StubFactory;

    impl ImageFactory for StubFactory {
        fn image_file(&self, _icons: &IconSet, build_dir: &Path, kind: IconKind) -> Result<PathBuf> {
            std::fs::create_dir_all(build_dir)?;
            let output = build_dir.join(format!("icon.{}", kind.extension()));
            std::fs::write(&output, b"icon")?;
            Ok(output)
        }
    }

    #[derive(Default)]
    struct RecordingSigner {
        signed: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl BundleSigner for RecordingSigner {
        async fn sign_application(&self, bundle: &Path) -> Result<()> {
            self.signed.lock().unwrap().push(bundle.to_path_buf());
            Ok(())
        }
    }

    struct FailingSigner;

    #[async_trait]
    impl BundleSigner for FailingSigner {
        async fn sign_application(&self, _bundle: &Path) -> Result<()> {
            Err(Error::Sign("identity not found".into()))
        }
    }

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn native_setup(dir: &Path) -> SetupDescription {
        write(&dir.join("bin/demo"), "#!/bin/sh\n");
        write(&dir.join("bin/viewer"), "#!/bin/sh\n");
        SetupBuilder::new()
            .application("Demo")
            .app_identifier("demo")
            .bundle_identifier("com.example.demo")
            .version("1.2.0")
            .binaries_dir("bin")
            .project_dir(dir)
            .build()
            .unwrap()
    }

    fn context(setup: &SetupDescription, dir: &Path) -> PlatformContext {
        PlatformContext::macos_app(
            PackageType::AppBundle,
            dir.join("out"),
            setup,
            &MacOsSettings::default(),
        )
    }

    fn application(name: &str, executable: &str) -> ApplicationDescription {
        let mut app = ApplicationDescription::new();
        app.set_display_name(Some(name.into()));
        app.set_executable(Some(executable.into()));
        app
    }

    fn manifest(bundle: &Path) -> plist::Dictionary {
        Value::from_file(bundle.join("Contents/Info.plist"))
            .unwrap()
            .into_dictionary()
            .unwrap()
    }

    #[tokio::test]
    async fn test_failed_stage_leaves_no_manifest_and_siblings_continue() {
        let dir = tempfile::tempdir().unwrap();
        let setup = native_setup(dir.path());
        let ctx = context(&setup, dir.path());

        let mut broken = application("Broken", "demo");
        broken.add_document_type(DocumentType {
            name: "Nothing".into(),
            ..Default::default()
        });
        let viewer = application("Viewer", "viewer");

        let signer = RecordingSigner::default();
        let outcomes = assemble_applications(
            &ctx,
            &setup,
            &[broken, viewer],
            &StubFactory,
            Some(&signer),
        )
        .await
        .unwrap();

        assert_eq!(outcomes.len(), 2);
        match &outcomes[0].result {
            Err(Error::Stage {
                stage, application, ..
            }) => {
                assert_eq!(*stage, Stage::ConfigureDocumentTypes);
                assert_eq!(application, "Broken");
            }
            other => panic!("expected a stage failure, got {other:?}"),
        }
        assert!(outcomes[0].result.as_ref().unwrap_err().is_configuration_error());

        let broken_dir = dir.path().join("out/Broken.app");
        assert!(!broken_dir.join("Contents/Info.plist").exists());
        assert!(!broken_dir.join("Contents/MacOS").exists());

        let viewer_dir = dir.path().join("out/Viewer.app");
        assert!(viewer_dir.join("Contents/Info.plist").is_file());
        assert!(viewer_dir.join("Contents/MacOS/viewer").is_file());

        let signed = signer.signed.lock().unwrap().clone();
        assert_eq!(signed, vec![viewer_dir]);

        match into_bundles(outcomes) {
            Err(Error::ApplicationsFailed { failures }) => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].contains("Broken"));
            }
            other => panic!("expected ApplicationsFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_native_bundle_layout_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let setup = native_setup(dir.path());
        let ctx = context(&setup, dir.path());

        let bundle = run_application_pipeline(
            &ctx,
            &setup,
            &ApplicationDescription::new(),
            &StubFactory,
            None,
        )
        .await
        .unwrap();

        assert_eq!(bundle.application, "Demo");
        assert_eq!(bundle.path, dir.path().join("out/Demo.app"));
        assert!(!bundle.signed);
        assert!(bundle.path.join("Contents/MacOS/demo").is_file());

        let manifest = manifest(&bundle.path);
        let get = |key: &str| manifest.get(key).and_then(Value::as_string);
        assert_eq!(get("CFBundleExecutable"), Some("demo"));
        assert_eq!(get("CFBundleIdentifier"), Some("com.example.demo"));
        assert_eq!(get("CFBundleVersion"), Some("1.2.0"));
        assert_eq!(get("CFBundleDevelopmentRegion"), Some("en"));
        assert!(manifest.get("CFBundleIconFile").is_none());
        assert!(manifest.get("LauncherName").is_none());
        assert!(manifest.get("CFBundleDocumentTypes").is_none());
    }

    #[tokio::test]
    async fn test_secondary_executable_gets_suffixed_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let setup = native_setup(dir.path());
        let ctx = context(&setup, dir.path());

        let bundle = run_application_pipeline(
            &ctx,
            &setup,
            &application("Viewer", "viewer"),
            &StubFactory,
            None,
        )
        .await
        .unwrap();

        let manifest = manifest(&bundle.path);
        assert_eq!(
            manifest.get("CFBundleIdentifier").and_then(Value::as_string),
            Some("com.example.demo.viewer")
        );
    }

    #[tokio::test]
    async fn test_launcher_bundle_carries_archive_and_main_class() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("bin/launcher"), "#!/bin/sh\n");
        write(&dir.path().join("lib/demo.jar"), "PK");
        let setup = SetupBuilder::new()
            .application("Demo")
            .app_identifier("demo")
            .main_archive("lib/demo.jar")
            .main_class("com.example.Demo")
            .runtime_launcher_name("java")
            .launcher_path("bin/launcher")
            .project_dir(dir.path())
            .build()
            .unwrap();
        let ctx = context(&setup, dir.path());

        let mut app = ApplicationDescription::new();
        app.add_vm_argument("-Xmx512m");
        app.set_start_arguments(Some("--viewer".into()));

        let bundle = run_application_pipeline(&ctx, &setup, &app, &StubFactory, None)
            .await
            .unwrap();

        assert!(bundle.path.join("Contents/Resources/app/demo.jar").is_file());
        assert_eq!(
            std::fs::read_to_string(bundle.path.join("Contents/MacOS/demo")).unwrap(),
            "#!/bin/sh\n"
        );

        let manifest = manifest(&bundle.path);
        let get = |key: &str| manifest.get(key).and_then(Value::as_string);
        assert_eq!(get("LauncherName"), Some("java"));
        assert_eq!(get("LauncherMainClass"), Some("com.example.Demo"));
        assert_eq!(get("LauncherClassPath"), Some("app/demo.jar"));
        assert_eq!(get("LauncherArguments"), Some("--viewer"));
        let options = manifest
            .get("LauncherOptions")
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].as_string(), Some("-Xmx512m"));
    }

    #[tokio::test]
    async fn test_prepare_without_executable_source_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let setup = SetupBuilder::new()
            .application("Demo")
            .project_dir(dir.path())
            .build()
            .unwrap();
        let ctx = context(&setup, dir.path());

        let err = run_application_pipeline(
            &ctx,
            &setup,
            &ApplicationDescription::new(),
            &StubFactory,
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Stage {
                stage: Stage::Prepare,
                ..
            }
        ));
        assert!(err.is_configuration_error());
        assert!(!dir.path().join("out/Demo.app").exists());
    }

    #[test]
    fn test_stages_cannot_be_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let setup = native_setup(dir.path());
        let ctx = context(&setup, dir.path());

        let mut state = pipeline::prepare(&ctx, &setup, &ApplicationDescription::new()).unwrap();
        assert_eq!(state.completed(), Stage::Prepare);

        assert!(pipeline::finish(&mut state, &ctx).is_err());
        assert_eq!(state.completed(), Stage::Prepare);
        assert!(!state.bundle_dir.join("Contents/Info.plist").exists());

        pipeline::configure_document_types(&mut state, &setup).unwrap();
        assert!(pipeline::configure_document_types(&mut state, &setup).is_err());
        let written = pipeline::finish(&mut state, &ctx).unwrap();
        assert!(written.is_file());
        assert_eq!(state.completed(), Stage::Finish);
    }

    #[tokio::test]
    async fn test_icons_and_document_types_are_copied() {
        let dir = tempfile::tempdir().unwrap();
        let setup = native_setup(dir.path());
        let ctx = context(&setup, dir.path());

        let mut app = ApplicationDescription::new();
        app.set_icons(Some(IconSet::new(vec![PathBuf::from("assets/icon.png")])));
        app.add_document_type(DocumentType {
            name: "Demo Project".into(),
            extensions: vec![".demo".into()],
            mime_types: vec!["application/x-demo".into()],
            icon: Some(PathBuf::from("assets/document.png")),
            ..Default::default()
        });

        let signer = RecordingSigner::default();
        let bundle = run_application_pipeline(&ctx, &setup, &app, &StubFactory, Some(&signer))
            .await
            .unwrap();

        assert!(bundle.signed);
        let resources = bundle.path.join("Contents/Resources");
        assert!(resources.join("demo.icns").is_file());
        assert!(resources.join("document.icns").is_file());

        let manifest = manifest(&bundle.path);
        assert_eq!(
            manifest.get("CFBundleIconFile").and_then(Value::as_string),
            Some("demo.icns")
        );
        let documents = manifest
            .get("CFBundleDocumentTypes")
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(documents.len(), 1);
        let document = documents[0].as_dictionary().unwrap();
        assert_eq!(
            document.get("CFBundleTypeName").and_then(Value::as_string),
            Some("Demo Project")
        );
        assert_eq!(
            document.get("CFBundleTypeRole").and_then(Value::as_string),
            Some("Editor")
        );
        assert_eq!(
            document.get("CFBundleTypeIconFile").and_then(Value::as_string),
            Some("document.icns")
        );
        let extensions = document
            .get("CFBundleTypeExtensions")
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(extensions[0].as_string(), Some("demo"));
    }

    #[tokio::test]
    async fn test_resource_patterns_are_copied_into_app_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("docs/readme.txt"), "read me");
        write(&dir.path().join("docs/notes.md"), "skip me");
        write(&dir.path().join("bin/demo"), "#!/bin/sh\n");
        let setup = SetupBuilder::new()
            .application("Demo")
            .app_identifier("demo")
            .binaries_dir("bin")
            .resources(vec!["docs/*.txt".into()])
            .project_dir(dir.path())
            .build()
            .unwrap();
        let ctx = context(&setup, dir.path());

        let bundle = run_application_pipeline(
            &ctx,
            &setup,
            &ApplicationDescription::new(),
            &StubFactory,
            None,
        )
        .await
        .unwrap();

        let app_dir = bundle.path.join("Contents/Resources/app");
        assert!(app_dir.join("readme.txt").is_file());
        assert!(!app_dir.join("notes.md").exists());
    }

    #[tokio::test]
    async fn test_colliding_bundle_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let setup = native_setup(dir.path());
        let ctx = context(&setup, dir.path());

        let mut first = ApplicationDescription::new();
        first.set_executable(Some("demo".into()));
        let mut second = ApplicationDescription::new();
        second.set_executable(Some("viewer".into()));

        let err = assemble_applications(&ctx, &setup, &[first, second], &StubFactory, None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidConfiguration(_)));
        let message = err.to_string();
        assert!(message.contains("#1"));
        assert!(message.contains("#2"));
        assert!(message.contains("Demo.app"));
        assert!(!dir.path().join("out/Demo.app").exists());

        let shouting = application("DEMO", "viewer");
        let err = assemble_applications(
            &ctx,
            &setup,
            &[ApplicationDescription::new(), shouting],
            &StubFactory,
            None,
        )
        .await
        .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[tokio::test]
    async fn test_failed_signing_leaves_assembled_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let setup = native_setup(dir.path());
        let ctx = context(&setup, dir.path());

        let err = run_application_pipeline(
            &ctx,
            &setup,
            &ApplicationDescription::new(),
            &StubFactory,
            Some(&FailingSigner),
        )
        .await
        .unwrap_err();

        match &err {
            Error::Stage {
                stage, application, ..
            } => {
                assert_eq!(*stage, Stage::Sign);
                assert_eq!(application, "Demo");
            }
            other => panic!("expected a sign stage failure, got {other:?}"),
        }
        assert!(err.to_string().contains("identity not found"));

        let bundle = dir.path().join("out/Demo.app");
        assert!(bundle.join("Contents/Info.plist").is_file());
        assert!(bundle.join("Contents/MacOS/demo").is_file());
    }

    #[tokio::test]
    async fn test_rerun_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let setup = native_setup(dir.path());
        let ctx = context(&setup, dir.path());
        let app = ApplicationDescription::new();

        write(&dir.path().join("bin/demo"), "v1");
        let bundle = run_application_pipeline(&ctx, &setup, &app, &StubFactory, None)
            .await
            .unwrap();
        let executable = bundle.path.join("Contents/MacOS/demo");
        assert_eq!(std::fs::read_to_string(&executable).unwrap(), "v1");

        write(&dir.path().join("bin/demo"), "v2");
        let rerun = run_application_pipeline(&ctx, &setup, &app, &StubFactory, None)
            .await
            .unwrap();

        assert_eq!(rerun.path, bundle.path);
        assert_eq!(std::fs::read_to_string(&executable).unwrap(), "v2");
        assert!(rerun.path.join("Contents/Info.plist").is_file());
    }
}
