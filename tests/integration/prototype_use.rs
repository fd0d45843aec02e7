use predicates::prelude::*;
use serde_json::json;

use crate::common::TestProject;

#[test]
fn test_use_deployment_with_flags() {
    let project = TestProject::new();

    project
        .stencil()
        .args([
            "prototype",
            "use",
            "single-port-deployment",
            "myDeployment",
            "--image=nginx",
            "--containerPort=80",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created component"));

    let text = project.read_file("components/myDeployment.jsonnet");
    assert!(text.contains("name: \"myDeployment\","));
    assert!(text.contains("image: \"nginx\","));
    assert!(text.contains("replicas: 1,"));
    assert!(text.contains("ports: [{ containerPort: 80 }],"));

    let params = project.read_json("components/params.json");
    assert_eq!(
        params["components"]["myDeployment"],
        json!({"containerPort": 80, "image": "nginx", "name": "myDeployment", "replicas": 1})
    );
}

#[test]
fn test_use_missing_required_params_lists_all() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["prototype", "use", "single-port-deployment", "web"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("The following required parameters are missing"))
        .stderr(predicate::str::contains("--containerPort=<number>"))
        .stderr(predicate::str::contains("--image=<string>"));

    assert!(!project.app_dir().join("components/web.jsonnet").exists());
}

#[test]
fn test_use_values_file() {
    let project = TestProject::new();
    project.write_file("web.env", "image=nginx:1.25\ncontainerPort = 8080\n\nreplicas=3\nunknown=1\n");

    project
        .stencil()
        .args(["prototype", "use", "deployment", "web", "--values-file", "web.env"])
        .assert()
        .success();

    let params = project.read_json("components/params.json");
    assert_eq!(
        params["components"]["web"],
        json!({"containerPort": 8080, "image": "nginx:1.25", "name": "web", "replicas": 3})
    );
}

#[test]
fn test_use_values_file_invalid_line() {
    let project = TestProject::new();
    project.write_file("bad.env", "image=nginx\nnovalue\n");

    project
        .stencil()
        .args(["prototype", "use", "deployment", "web", "--values-file=bad.env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"novalue\" is invalid. value format is key=value"));
}

#[test]
fn test_use_nested_component_with_template_type() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["prototype", "use", "configmap", "backend/settings", "json", "--value=on"])
        .assert()
        .success();

    let text = project.read_file("components/backend/settings.json");
    let rendered: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(rendered["metadata"]["name"], json!("settings"));
    assert_eq!(rendered["data"]["config"], json!("on"));

    let params = project.read_json("components/backend/params.json");
    assert_eq!(params["components"]["settings"]["value"], json!("on"));
}

#[test]
fn test_use_wrong_template_type() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["prototype", "use", "configmap", "settings", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not provide a yaml template"));
}

#[test]
fn test_use_type_mismatch() {
    let project = TestProject::new();

    project
        .stencil()
        .args([
            "prototype",
            "use",
            "deployment",
            "web",
            "--image=nginx",
            "--containerPort=eighty",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not convert parameter 'containerPort' to number"));
}

#[test]
fn test_use_existing_component_fails() {
    let project = TestProject::new();
    project.create_web_deployment();

    project
        .stencil()
        .args(["prototype", "use", "deployment", "web", "--image=redis", "--containerPort=6379"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("create component"))
        .stderr(predicate::str::contains("already exists"));

    assert!(project.read_file("components/web.jsonnet").contains("\"nginx\""));
}

#[test]
fn test_use_prototype_help() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["prototype", "use", "deployment", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--containerPort"))
        .stdout(predicate::str::contains("--values-file"));

    assert!(!project.app_dir().join("components/params.json").exists());
}

#[test]
fn test_use_unknown_prototype_suggests() {
    let project = TestProject::new();

    project
        .stencil()
        .args(["prototype", "use", "confgmap", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no prototype names matched 'confgmap'"))
        .stderr(predicate::str::contains("io.stencil.pkg.configmap"));
}
