use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::common::TestProject;

#[test]
fn test_outside_app_suggests_init() {
    let temp = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("stencil").unwrap();
    cmd.current_dir(temp.path())
        .env("NO_COLOR", "1")
        .env("STENCIL_CONFIG", temp.path().join("config.toml"))
        .args(["prototype", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("app.toml not found"))
        .stderr(predicate::str::contains("stencil init"));
}

#[test]
fn test_invalid_global_config() {
    let project = TestProject::new();
    std::fs::write(project.config_path(), "prototype_paths = 3\n").unwrap();

    project
        .stencil()
        .args(["prototype", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load global config"));
}

#[test]
fn test_invalid_prototype_in_library() {
    let project = TestProject::new();
    project.write_file("prototypes/broken.yaml", "# @name io.example.broken\nkind: Broken\n");

    project
        .stencil()
        .args(["prototype", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid prototype definition"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["--verbose", "prototype", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded"));
}
