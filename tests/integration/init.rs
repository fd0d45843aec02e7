use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::common::TestProject;

#[test]
fn test_init_creates_app_skeleton() {
    let project = TestProject::new();
    let app = project.app_dir();

    assert!(app.join("app.toml").is_file());
    assert!(app.join("components").is_dir());
    assert!(app.join("prototypes").is_dir());
    assert!(app.join("environments/default/params.json").is_file());

    let metadata = project.read_file("app.toml");
    assert!(metadata.contains("name = \"guestbook\""));
    assert!(metadata.contains("default"));
}

#[test]
fn test_init_with_dir() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("nested/app");

    let mut cmd = Command::cargo_bin("stencil").unwrap();
    cmd.current_dir(temp.path())
        .env("NO_COLOR", "1")
        .args(["init", "guestbook", "--dir"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized app 'guestbook'"));

    assert!(target.join("app.toml").is_file());
}

#[test]
fn test_init_twice_fails() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["init", "guestbook", "--dir", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
