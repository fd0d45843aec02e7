use predicates::prelude::*;
use serde_json::json;

use crate::common::TestProject;

#[test]
fn test_set_component_param() {
    let project = TestProject::new();
    project.create_web_deployment();

    project.stencil().args(["param", "set", "web", "replicas", "3"]).assert().success();
    project.stencil().args(["param", "set", "web", "image", "nginx:1.25"]).assert().success();

    let params = project.read_json("components/params.json");
    assert_eq!(params["components"]["web"]["replicas"], json!(3));
    assert_eq!(params["components"]["web"]["image"], json!("nginx:1.25"));
}

#[test]
fn test_set_structured_value_and_nested_path() {
    let project = TestProject::new();
    project.create_web_deployment();

    project
        .stencil()
        .args(["param", "set", "web", "labels", r#"{"tier": "frontend"}"#])
        .assert()
        .success();
    project.stencil().args(["param", "set", "web", "labels.tier", "backend"]).assert().success();

    let params = project.read_json("components/params.json");
    assert_eq!(params["components"]["web"]["labels"], json!({"tier": "backend"}));
}

#[test]
fn test_set_with_index() {
    let project = TestProject::new();
    project.create_web_deployment();

    project
        .stencil()
        .args(["param", "set", "web", "ports", r#"[{"port": 80}, {"port": 443}]"#])
        .assert()
        .success();
    project
        .stencil()
        .args(["param", "set", "web", "ports.port", "8443", "--index", "1"])
        .assert()
        .success();

    let params = project.read_json("components/params.json");
    assert_eq!(params["components"]["web"]["ports"], json!([{"port": 80}, {"port": 8443}]));

    project
        .stencil()
        .args(["param", "set", "web", "ports.port", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("an index is required"));
}

#[test]
fn test_set_global_param() {
    let project = TestProject::new();

    project.stencil().args(["param", "set", "/", "replicas", "2", "--global"]).assert().success();

    let params = project.read_json("components/params.json");
    assert_eq!(params["global"]["replicas"], json!(2));
}

#[test]
fn test_set_env_param() {
    let project = TestProject::new();
    project.create_web_deployment();

    project
        .stencil()
        .args(["param", "set", "web", "image.tag", "v2", "--env", "default"])
        .assert()
        .success()
        .stdout(predicate::str::contains("environment 'default'"));

    let overrides = project.read_json("environments/default/params.json");
    assert_eq!(overrides["components"]["web"], json!({"image.tag": "v2"}));

    let params = project.read_json("components/params.json");
    assert_eq!(params["components"]["web"]["image"], json!("nginx"));
}

#[test]
fn test_set_env_and_global_conflict() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["param", "set", "/", "replicas", "2", "--global", "--env", "default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to set global param for environments"));
}

#[test]
fn test_set_invalid_value() {
    let project = TestProject::new();
    project.create_web_deployment();

    project
        .stencil()
        .args(["param", "set", "web", "replicas", "[1, 2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("value is invalid"));
}

#[test]
fn test_set_unknown_component() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["param", "set", "nope", "replicas", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find component"))
        .stderr(predicate::str::contains("component 'nope' does not exist"));
}

#[test]
fn test_set_global_rejects_namespace_outside_components() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["param", "set", "..", "replicas", "9", "--global"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("namespace '..' does not exist"));

    assert!(!project.app_dir().join("params.json").exists());
}

#[test]
fn test_set_unknown_environment() {
    let project = TestProject::new();
    project.create_web_deployment();

    project
        .stencil()
        .args(["param", "set", "web", "replicas", "1", "--env", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("environment 'prod' does not exist"));
}
