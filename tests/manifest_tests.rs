#[cfg(test)]
mod tests {
    use kodegen_bundler_setup::{
        BundlerError,
        bundler::DocumentRole,
        metadata::{load_manifest, parse_manifest},
    };
    use std::path::{Path, PathBuf};

    fn fixture() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/setup.toml")
    }

    #[test]
    fn test_fixture_manifest() {
        let manifest = load_manifest(&fixture()).unwrap();
        let setup = &manifest.setup;
        let fixtures = fixture().parent().unwrap().to_path_buf();

        assert_eq!(setup.application(), "Demo");
        assert_eq!(setup.vendor(), Some("Demo Corp"));
        assert_eq!(setup.bundle_identifier(), "com.example.demo");
        assert_eq!(setup.project_dir(), fixtures);
        assert_eq!(setup.binaries_dir(), Some(fixtures.join("bin").as_path()));

        assert_eq!(manifest.applications.len(), 2);
        let viewer = &manifest.applications[1];
        assert_eq!(viewer.display_name(setup), "Demo Viewer");
        assert_eq!(viewer.executable(), Some("demo-viewer"));
        assert_eq!(viewer.start_arguments(), "--viewer");
        assert_eq!(viewer.document_types().len(), 1);
        assert_eq!(viewer.document_types()[0].role, DocumentRole::Viewer);
        assert!(manifest.applications[0].document_types().is_empty());

        assert_eq!(manifest.msi.languages, vec!["en", "de"]);
        assert_eq!(manifest.msi.i18n.len(), 2);
        assert_eq!(manifest.msi.i18n[0].locale.language_id, "en");
        assert_eq!(manifest.msi.i18n[1].locale.language_id, "de");

        let settings = manifest.into_builder().build().unwrap();
        assert_eq!(settings.applications().len(), 2);
    }

    #[test]
    fn test_project_dir_is_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let content = "[setup]\napplication = \"Demo\"\nproject_dir = \"app\"\nbuild_dir = \"out\"\n";
        let manifest = parse_manifest(content, dir.path()).unwrap();

        assert_eq!(manifest.setup.project_dir(), dir.path().join("app"));
        assert_eq!(manifest.setup.build_dir(), dir.path().join("app/out"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_manifest("[setup]\napplication = \"Demo\"\nflavour = \"x\"\n", dir.path())
            .unwrap_err();
        assert!(matches!(err, BundlerError::Toml(_)));
    }

    #[test]
    fn test_misspelled_localized_entry_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let content = "[setup]\napplication = \"Demo\"\n\n[msi]\ni18n = [{ locale = \"de\", resurce = \"messages_de.properties\" }]\n";
        let err = parse_manifest(content, dir.path()).unwrap_err();
        assert!(matches!(err, BundlerError::Toml(_)));

        let content = "[setup]\napplication = \"Demo\"\n\n[msi]\ni18n = [{ locale = \"de\", resource = \"messages_de.properties\" }]\n";
        let manifest = parse_manifest(content, dir.path()).unwrap();
        assert_eq!(manifest.msi.i18n.len(), 1);
        assert_eq!(manifest.msi.i18n[0].locale.language_id, "de");
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(&dir.path().join("setup.toml")).unwrap_err();
        assert!(matches!(err, BundlerError::Cli(_)));
    }
}
