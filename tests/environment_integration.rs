//! Environment scanning against real directories.

use std::path::PathBuf;
use std::time::Duration;

use codeprobe::env::{scan_with, PackageQuery};
use codeprobe::{Engine, ErrorKind};
use tempfile::TempDir;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn missing_package_manager() -> PackageQuery {
    PackageQuery::with_command("codeprobe-no-such-package-manager", ["list", "--format=json"])
}

#[test]
fn project_without_manifests() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("main.py"), "print('hi')\n").unwrap();

    let section = Engine::default().analyze_dependencies_with(temp.path(), &missing_package_manager());
    assert!(section.success);
    let scan = section.payload().unwrap();
    assert!(scan.manifests_found.is_empty());
}

#[test]
fn package_manager_missing_is_partial_success() {
    let section =
        Engine::default().analyze_dependencies_with(&testdata_path().join("project"), &missing_package_manager());

    assert!(section.success);
    let scan = section.payload().unwrap();
    assert_eq!(scan.manifests_found, vec!["requirements.txt", "pyproject.toml"]);
    assert!(!scan.installed_packages.success);
    assert!(scan
        .installed_packages
        .error()
        .unwrap()
        .starts_with("SubprocessFailure"));
}

#[test]
fn every_manifest_recognized() {
    let temp = TempDir::new().unwrap();
    for name in codeprobe::config::MANIFEST_FILES {
        std::fs::write(temp.path().join(name), "").unwrap();
    }

    let section = Engine::default().analyze_dependencies_with(temp.path(), &missing_package_manager());
    let scan = section.payload().unwrap();
    assert_eq!(scan.manifests_found, codeprobe::config::MANIFEST_FILES);
}

#[test]
fn not_a_directory() {
    let section = Engine::default().analyze_dependencies_with(
        &testdata_path().join("clean.py"),
        &missing_package_manager(),
    );
    assert!(!section.success);
    assert!(section.error().unwrap().starts_with("IOError"));
}

#[tokio::test]
async fn sync_entry_point_inside_runtime() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("requirements.txt"), "").unwrap();

    let section = codeprobe::analyze_dependencies(temp.path());
    assert!(section.success, "{:?}", section.error());
    assert_eq!(section.payload().unwrap().manifests_found, vec!["requirements.txt"]);

    let section = Engine::default().analyze_dependencies_with(temp.path(), &missing_package_manager());
    assert!(section.success);
}

#[tokio::test]
async fn async_scan_of_missing_path() {
    let temp = TempDir::new().unwrap();
    let err = scan_with(&temp.path().join("gone"), &missing_package_manager())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[cfg(unix)]
#[test]
fn injected_inventory_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("Pipfile"), "").unwrap();

    let query = PackageQuery::with_command(
        "sh",
        ["-c", r#"echo '[{"name": "flask", "version": "3.0.0"}]'"#],
    );
    let section = Engine::default().analyze_dependencies_with(temp.path(), &query);
    let scan = section.payload().unwrap();
    assert_eq!(scan.manifests_found, vec!["Pipfile"]);

    let packages = scan.installed_packages.payload().unwrap();
    assert_eq!(packages.version_of("Flask"), Some("3.0.0"));

    let json = serde_json::to_value(&section).unwrap();
    assert_eq!(json["installed_packages"]["success"], true);
    assert_eq!(json["installed_packages"]["packages"][0]["name"], "flask");
}

#[cfg(unix)]
#[test]
fn slow_package_manager_times_out() {
    let temp = TempDir::new().unwrap();
    let query = PackageQuery::with_command("sh", ["-c", "sleep 5"]).timeout(Duration::from_millis(100));

    let section = Engine::default().analyze_dependencies_with(temp.path(), &query);
    assert!(section.success);
    let scan = section.payload().unwrap();
    assert!(scan.installed_packages.error().unwrap().contains("timed out"));
}

#[test]
fn repeated_scans_see_new_manifests() {
    let temp = TempDir::new().unwrap();
    let engine = Engine::default();
    let query = missing_package_manager();

    let before = engine.analyze_dependencies_with(temp.path(), &query);
    assert!(before.payload().unwrap().manifests_found.is_empty());

    std::fs::write(temp.path().join("setup.cfg"), "").unwrap();
    let after = engine.analyze_dependencies_with(temp.path(), &query);
    assert_eq!(after.payload().unwrap().manifests_found, vec!["setup.cfg"]);
}
