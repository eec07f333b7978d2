#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::path::Path;

    fn setup_builder() -> Command {
        Command::cargo_bin("kodegen_bundler_setup").unwrap()
    }

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_setup_file_fails() {
        let dir = tempfile::tempdir().unwrap();

        setup_builder()
            .current_dir(dir.path())
            .arg("--config")
            .arg("missing.toml")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Setup file not found"));
    }

    #[test]
    fn test_unknown_platform_is_rejected() {
        setup_builder()
            .args(["--platform", "deb"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown package type 'deb'"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        setup_builder().args(["-v", "-q"]).assert().failure();
    }

    #[test]
    fn test_unknown_default_language_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("setup.toml"),
            "[setup]\napplication = \"Demo\"\ndefault_language = \"klingon\"\n",
        );

        setup_builder()
            .current_dir(dir.path())
            .args(["--platform", "app"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown locale 'klingon'"));
    }

    #[test]
    fn test_builds_app_bundle_and_report() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("setup.toml"),
            "[setup]\n\
             application = \"Demo\"\n\
             app_identifier = \"demo\"\n\
             version = \"2.0.1\"\n\
             binaries_dir = \"bin\"\n",
        );
        write(&dir.path().join("bin/demo"), "#!/bin/sh\n");
        let report = dir.path().join("report.json");

        setup_builder()
            .arg("--config")
            .arg(dir.path().join("setup.toml"))
            .args(["--platform", "app", "--quiet"])
            .arg("--output-dir")
            .arg(dir.path().join("dist"))
            .arg("--report")
            .arg(&report)
            .assert()
            .success();

        let bundle = dir.path().join("dist/Demo.app");
        assert!(bundle.join("Contents/Info.plist").is_file());
        assert!(bundle.join("Contents/MacOS/demo").is_file());

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        let artifacts = json.as_array().unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0]["package_type"], "app");
        assert_eq!(artifacts[0]["checksum"].as_str().unwrap().len(), 64);
    }
}
