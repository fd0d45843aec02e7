//! Environments and their flat parameter override tables.
//!
//! Each environment keeps `environments/<env>/params.json`:
//!
//! ```json
//! { "components": { "web": { "replicas": 5, "image": "nginx:prod" } } }
//! ```
//!
//! Overrides are flat: one parameter name per key, no path walking.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::app::App;
use crate::constants::PARAMS_FILE;
use crate::utils::{ensure_dir, read_json_file, write_json_file};

/// Contents of an environment's `params.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentParams {
    /// Overrides by component name, then parameter name
    #[serde(default)]
    pub components: BTreeMap<String, Map<String, Value>>,
}

/// Path of an environment's override table.
#[must_use]
pub fn params_path(app: &App, env: &str) -> PathBuf {
    app.environment_dir(env).join(PARAMS_FILE)
}

/// Add an environment: record it in `app.toml` and create its override table.
///
/// # Errors
///
/// Fails if the name is invalid or taken, or a file cannot be written.
pub fn add(app: &mut App, name: &str, namespace: &str) -> Result<()> {
    app.add_environment(name, namespace)?;

    ensure_dir(&app.environment_dir(name))?;
    write_json_file(&params_path(app, name), &EnvironmentParams::default())?;

    tracing::info!("Added environment '{}' (namespace '{}')", name, namespace);
    Ok(())
}

/// Load an environment's override table. A missing file is an empty table.
///
/// # Errors
///
/// Fails if the environment is not defined or the file is invalid.
pub fn load_params(app: &App, env: &str) -> Result<EnvironmentParams> {
    app.environment(env)?;

    let path = params_path(app, env);
    if !path.exists() {
        return Ok(EnvironmentParams::default());
    }
    read_json_file(&path).with_context(|| format!("Failed to load params for environment '{env}'"))
}

/// Set flat parameters for one component in one environment.
///
/// `params` maps parameter names to literals (JSON literal syntax).
///
/// # Errors
///
/// Fails if the environment is not defined, a literal is not valid JSON, or
/// the table cannot be written.
pub fn set_params(
    app: &App,
    env: &str,
    component: &str,
    params: &BTreeMap<String, String>,
) -> Result<()> {
    let mut table = load_params(app, env)?;

    let overrides = table.components.entry(component.to_string()).or_default();
    for (name, literal) in params {
        let value: Value = serde_json::from_str(literal)
            .with_context(|| format!("parameter '{name}' is not a valid literal: {literal}"))?;
        overrides.insert(name.clone(), value);
    }

    write_json_file(&params_path(app, env), &table)?;
    tracing::info!("Set {} param(s) for '{}' in environment '{}'", params.len(), component, env);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StencilError;
    use crate::test_utils::TestApp;
    use serde_json::json;

    #[test]
    fn test_add_environment_creates_table() {
        let mut test_app = TestApp::new("guestbook");
        add(&mut test_app.app, "prod", "guestbook-prod").unwrap();

        assert!(params_path(&test_app.app, "prod").is_file());
        assert_eq!(load_params(&test_app.app, "prod").unwrap(), EnvironmentParams::default());
        assert_eq!(test_app.app.environment("prod").unwrap().namespace, "guestbook-prod");
    }

    #[test]
    fn test_set_params_merges() {
        let test_app = TestApp::new("guestbook");

        let first = BTreeMap::from([("replicas".to_string(), "5".to_string())]);
        set_params(&test_app.app, "default", "web", &first).unwrap();
        let second = BTreeMap::from([("image".to_string(), r#""nginx:prod""#.to_string())]);
        set_params(&test_app.app, "default", "web", &second).unwrap();

        let table = load_params(&test_app.app, "default").unwrap();
        assert_eq!(Value::Object(table.components["web"].clone()), json!({"replicas": 5, "image": "nginx:prod"}));
    }

    #[test]
    fn test_unknown_environment() {
        let test_app = TestApp::new("guestbook");
        let err = set_params(&test_app.app, "nope", "web", &BTreeMap::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StencilError>(),
            Some(StencilError::EnvironmentNotFound { .. })
        ));
    }
}
