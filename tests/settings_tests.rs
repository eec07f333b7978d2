#[cfg(test)]
mod tests {
    use kodegen_bundler_setup::bundler::{
        ApplicationDescription, Error, PackageType, SettingsBuilder, SetupBuilder,
        SetupDescription, resources::IconSet,
    };
    use std::path::{Path, PathBuf};

    fn setup(dir: &Path) -> SetupDescription {
        SetupBuilder::new()
            .application("Demo")
            .description("Demo suite")
            .main_archive("lib/demo.jar")
            .main_class("com.example.Demo")
            .icons(IconSet::new(vec![PathBuf::from("assets/icon.png")]))
            .default_language("en")
            .project_dir(dir)
            .build()
            .unwrap()
    }

    #[test]
    fn test_unset_fields_fall_back_to_setup() {
        let dir = tempfile::tempdir().unwrap();
        let setup = setup(dir.path());
        let app = ApplicationDescription::new();

        assert_eq!(app.display_name(&setup), "Demo");
        assert_eq!(app.description(&setup), Some("Demo suite"));
        assert_eq!(app.main_archive(&setup), Some(Path::new("lib/demo.jar")));
        assert_eq!(app.main_class(&setup), Some("com.example.Demo"));
        assert_eq!(app.icons(&setup), setup.icons());
    }

    #[test]
    fn test_local_values_win() {
        let dir = tempfile::tempdir().unwrap();
        let setup = setup(dir.path());
        let mut app = ApplicationDescription::new();
        app.set_display_name(Some("Viewer".into()));
        app.set_description(Some("Read-only viewer".into()));
        app.set_main_class(Some("com.example.Viewer".into()));

        assert_eq!(app.display_name(&setup), "Viewer");
        assert_eq!(app.description(&setup), Some("Read-only viewer"));
        assert_eq!(app.main_class(&setup), Some("com.example.Viewer"));
        assert_eq!(app.main_archive(&setup), Some(Path::new("lib/demo.jar")));
    }

    #[test]
    fn test_setup_change_before_read_is_observed() {
        let dir = tempfile::tempdir().unwrap();
        let mut setup = setup(dir.path());
        let app = ApplicationDescription::new();

        assert_eq!(app.display_name(&setup), "Demo");
        setup.set_application("Renamed");
        setup.set_description(None);
        assert_eq!(app.display_name(&setup), "Renamed");
        assert_eq!(app.description(&setup), None);
    }

    #[test]
    fn test_arguments_are_never_inherited() {
        let dir = tempfile::tempdir().unwrap();
        let setup = setup(dir.path());
        let mut app = ApplicationDescription::new();

        assert_eq!(app.start_arguments(), "");
        assert!(app.vm_arguments().is_empty());
        assert!(app.document_types().is_empty());

        app.add_vm_argument("-Xmx512m");
        let resolved = app.resolve(&setup);
        assert_eq!(resolved.vm_arguments, vec!["-Xmx512m".to_string()]);
    }

    #[test]
    fn test_resolved_executable_falls_back_to_app_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let setup = SetupBuilder::new()
            .application("Demo Suite")
            .app_identifier("demo-suite")
            .project_dir(dir.path())
            .build()
            .unwrap();

        let resolved = ApplicationDescription::new().resolve(&setup);
        assert_eq!(resolved.executable, "demo-suite");
        assert_eq!(resolved.display_name, "Demo Suite");

        let mut app = ApplicationDescription::new();
        app.set_executable(Some("viewer".into()));
        assert_eq!(app.resolve(&setup).executable, "viewer");
    }

    #[test]
    fn test_setup_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let setup = SetupBuilder::new()
            .application("Demo")
            .project_dir(dir.path())
            .build()
            .unwrap();

        assert_eq!(setup.app_identifier(), "Demo");
        assert_eq!(setup.bundle_identifier(), "Demo");
        assert_eq!(setup.version(), "1.0.0");
        assert_eq!(setup.default_language(), "en");
        assert_eq!(setup.build_dir(), dir.path().join("target/setup"));
        assert_eq!(setup.destination_dir(), dir.path().join("target/setup/bundle"));
    }

    #[test]
    fn test_missing_application_is_a_configuration_error() {
        let err = SetupBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_unknown_default_language_fails() {
        let err = SetupBuilder::new()
            .application("Demo")
            .default_language("klingon")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownLocale(_)));
    }

    #[test]
    fn test_default_language_accepts_culture_tags() {
        let setup = SetupBuilder::new()
            .application("Demo")
            .default_language("DE_de")
            .build()
            .unwrap();
        assert_eq!(setup.default_language(), "de");
    }

    #[test]
    fn test_settings_default_to_one_inheriting_application() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsBuilder::new()
            .setup(setup(dir.path()))
            .build()
            .unwrap();

        assert_eq!(settings.applications().len(), 1);
        assert_eq!(
            settings.applications()[0].display_name(settings.setup()),
            "Demo"
        );
        assert_eq!(settings.cache_dir(), dir.path().join("target/setup/i18n"));
        assert!(!settings.should_sign());
    }

    #[test]
    fn test_settings_require_setup() {
        assert!(SettingsBuilder::new().build().is_err());
    }

    #[test]
    fn test_package_type_priority() {
        assert_eq!(PackageType::AppBundle.priority(), 0);
        assert_eq!(PackageType::Msi.priority(), 0);
        assert!(PackageType::AppBundle.priority() < PackageType::Dmg.priority());
    }

    #[test]
    fn test_package_type_parsing() {
        assert_eq!("app".parse::<PackageType>(), Ok(PackageType::AppBundle));
        assert_eq!("DMG".parse::<PackageType>(), Ok(PackageType::Dmg));
        assert_eq!("msi".parse::<PackageType>(), Ok(PackageType::Msi));
        assert!("deb".parse::<PackageType>().is_err());
        assert_eq!(PackageType::AppBundle.to_string(), "app");
    }

    #[test]
    fn test_current_platform_types() {
        let types = PackageType::all_for_current_platform();
        assert!(!types.is_empty());

        #[cfg(target_os = "macos")]
        assert!(types.contains(&PackageType::Dmg));

        #[cfg(target_os = "windows")]
        assert!(types.contains(&PackageType::Msi));
    }
}
