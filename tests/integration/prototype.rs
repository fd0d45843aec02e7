use predicates::prelude::*;

use crate::common::TestProject;

const REDIS_PROTOTYPE: &str = r#"# @apiVersion 0.1.0
# @name io.example.redis
# @description Single redis instance.
# @shortDescription Redis
# @param name string Name of the instance
# @optionalParam maxMemory string "256mb" Memory limit
kind: Redis
metadata:
  name: {{ params.name }}
spec:
  maxMemory: {{ params.maxMemory }}
"#;

#[test]
fn test_list_includes_system_prototypes() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["prototype", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("NAME"))
        .stdout(predicate::str::contains("io.stencil.pkg.single-port-deployment"))
        .stdout(predicate::str::contains("io.stencil.pkg.single-port-service"))
        .stdout(predicate::str::contains("io.stencil.pkg.configmap"));
}

#[test]
fn test_list_includes_app_library() {
    let project = TestProject::new();
    project.write_file("prototypes/redis.yaml", REDIS_PROTOTYPE);

    project
        .stencil()
        .args(["prototype", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("io.example.redis"))
        .stdout(predicate::str::contains("Redis"));
}

#[test]
fn test_list_includes_global_prototype_paths() {
    let project = TestProject::new();
    let library = project.write_file("../shared/redis.yaml", REDIS_PROTOTYPE);
    let library_dir = library.parent().unwrap().to_path_buf();

    std::fs::write(
        project.config_path(),
        format!("prototype_paths = [{:?}]\n", library_dir.display().to_string()),
    )
    .unwrap();

    project
        .stencil()
        .args(["prototype", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"io.example.redis\""));
}

#[test]
fn test_search() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["prototype", "search", "port"])
        .assert()
        .success()
        .stdout(predicate::str::contains("single-port-deployment"))
        .stdout(predicate::str::contains("single-port-service"))
        .stdout(predicate::str::contains("configmap").not());

    project.stencil().args(["prototype", "search", "nothing-like-this"]).assert().failure();
}

#[test]
fn test_describe() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["prototype", "describe", "deployment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("io.stencil.pkg.single-port-deployment"))
        .stdout(predicate::str::contains("--containerPort=<number>"))
        .stdout(predicate::str::contains("--replicas=<number>"));
}

#[test]
fn test_describe_ambiguous_query() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["prototype", "describe", "single-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ambiguous match for 'single-port'"))
        .stderr(predicate::str::contains("io.stencil.pkg.single-port-deployment"))
        .stderr(predicate::str::contains("io.stencil.pkg.single-port-service"));
}

#[test]
fn test_preview_prints_rendered_component() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["prototype", "preview", "configmap", "--name=settings", "--value=hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"settings\""))
        .stdout(predicate::str::contains("\"config\": \"hello\""));

    assert!(!project.app_dir().join("components/settings.json").exists());
    assert!(!project.app_dir().join("components/params.json").exists());
}
