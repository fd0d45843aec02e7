use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_env_list_default() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["env", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NAME    NAMESPACE"))
        .stdout(predicate::str::contains("default default"));
}

#[test]
fn test_env_add_and_list() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["env", "add", "prod", "--namespace", "guestbook-prod"])
        .assert()
        .success();

    assert!(project.app_dir().join("environments/prod/params.json").is_file());
    assert!(project.read_file("app.toml").contains("guestbook-prod"));

    project
        .stencil()
        .args(["env", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prod    guestbook-prod"));

    project
        .stencil()
        .args(["env", "add", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("environment 'prod' already exists"));
}

#[test]
fn test_env_from_subdirectory_and_app_dir() {
    let project = TestProject::new();

    project
        .stencil()
        .current_dir(project.app_dir().join("components"))
        .args(["env", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default"));

    let mut cmd = project.stencil();
    cmd.current_dir(project.app_dir().parent().unwrap())
        .arg("--app-dir")
        .arg(project.app_dir())
        .args(["env", "list"])
        .assert()
        .success();
}
