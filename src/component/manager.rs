//! The component store seam used by the actions.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::PathBuf;

use super::namespace::{Component, Namespace};
use crate::app::{App, validate_name};
use crate::core::StencilError;
use crate::prototype::{QuotedValues, TemplateType};
use crate::utils::{atomic_write, ensure_dir};

/// Split `module/component` into its namespace and leaf name.
///
/// ```
/// use stencil_cli::component::split_component_name;
///
/// assert_eq!(split_component_name("web"), ("", "web"));
/// assert_eq!(split_component_name("apps/web/frontend"), ("apps/web", "frontend"));
/// ```
#[must_use]
pub fn split_component_name(name: &str) -> (&str, &str) {
    name.rsplit_once('/').unwrap_or(("", name))
}

/// Creates and locates components.
///
/// Actions depend on this trait rather than on the filesystem so they can be
/// exercised with a recording fake.
pub trait ComponentManager {
    /// Write a new component and record its parameters. Returns the component file path.
    ///
    /// # Errors
    ///
    /// Fails if the name is invalid, the component exists, or a write fails.
    fn create(
        &self,
        app: &App,
        name: &str,
        text: &str,
        params: &QuotedValues,
        template_type: TemplateType,
    ) -> Result<PathBuf>;

    /// Resolve an existing namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::NamespaceNotFound`] if it does not exist or the
    /// name would leave the `components/` directory.
    fn namespace(&self, app: &App, name: &str) -> Result<Namespace>;

    /// Resolve `module/component` to its namespace and component.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::ComponentNotFound`] if no such component exists
    /// or the query is not a well-formed component name.
    fn resolve_path(&self, app: &App, query: &str) -> Result<(Namespace, Component)>;
}

/// [`ComponentManager`] backed by the app's `components/` directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsManager;

impl ComponentManager for FsManager {
    fn create(
        &self,
        app: &App,
        name: &str,
        text: &str,
        params: &QuotedValues,
        template_type: TemplateType,
    ) -> Result<PathBuf> {
        validate_name("component", name)?;
        let (module, leaf) = split_component_name(name);

        let namespace = Namespace::new(app, module);
        if let Some(existing) = namespace.find_component(leaf)? {
            return Err(StencilError::ComponentExists {
                name: name.to_string(),
                path: existing.path().display().to_string(),
            }
            .into());
        }

        let mut values = Map::new();
        for (key, literal) in params {
            let value: Value = serde_json::from_str(literal)
                .with_context(|| format!("parameter '{key}' is not a valid literal: {literal}"))?;
            values.insert(key.clone(), value);
        }

        ensure_dir(namespace.dir())?;
        let path = namespace.dir().join(format!("{leaf}.{}", template_type.extension()));
        atomic_write(&path, text.as_bytes())?;

        let mut doc = namespace.load_params()?;
        doc.components.insert(leaf.to_string(), Value::Object(values));
        namespace.save_params(&doc)?;

        tracing::info!("Created component '{}' at {}", name, path.display());
        Ok(path)
    }

    fn namespace(&self, app: &App, name: &str) -> Result<Namespace> {
        let not_found = || StencilError::NamespaceNotFound {
            name: name.to_string(),
        };

        let trimmed = name.trim_matches('/');
        if !trimmed.is_empty() && validate_name("namespace", trimmed).is_err() {
            return Err(not_found().into());
        }

        let namespace = Namespace::new(app, trimmed);
        if !namespace.exists() {
            return Err(not_found().into());
        }
        Ok(namespace)
    }

    fn resolve_path(&self, app: &App, query: &str) -> Result<(Namespace, Component)> {
        let not_found = || StencilError::ComponentNotFound {
            name: query.to_string(),
        };

        let trimmed = query.trim_matches('/');
        if validate_name("component", trimmed).is_err() {
            return Err(not_found().into());
        }

        let (module, leaf) = split_component_name(trimmed);
        let namespace = Namespace::new(app, module);
        let component = namespace.find_component(leaf)?.ok_or_else(not_found)?;

        tracing::debug!("Resolved component '{}' in namespace '{}'", leaf, namespace.display_name());
        Ok((namespace, component))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestApp;
    use serde_json::json;

    fn quoted(pairs: &[(&str, &str)]) -> QuotedValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_create_writes_text_and_params() {
        let test_app = TestApp::new("guestbook");
        let path = FsManager
            .create(
                &test_app.app,
                "web",
                "{ replicas: 1 }\n",
                &quoted(&[("name", r#""web""#), ("replicas", "1")]),
                TemplateType::Jsonnet,
            )
            .unwrap();

        assert_eq!(path, test_app.app.components_dir().join("web.jsonnet"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ replicas: 1 }\n");

        let params = Namespace::root(&test_app.app).load_params().unwrap();
        assert_eq!(params.components["web"], json!({"name": "web", "replicas": 1}));
    }

    #[test]
    fn test_create_in_module() {
        let test_app = TestApp::new("guestbook");
        let path = FsManager
            .create(&test_app.app, "apps/web", "a: 1\n", &quoted(&[]), TemplateType::Yaml)
            .unwrap();
        assert_eq!(path, test_app.app.components_dir().join("apps").join("web.yaml"));

        let (namespace, component) = FsManager.resolve_path(&test_app.app, "apps/web").unwrap();
        assert_eq!(namespace.name(), "apps");
        assert_eq!(component.name(), "web");
        assert!(FsManager.namespace(&test_app.app, "apps").is_ok());
    }

    #[test]
    fn test_create_rejects_existing_component() {
        let test_app = TestApp::new("guestbook");
        FsManager.create(&test_app.app, "web", "{}", &quoted(&[]), TemplateType::Json).unwrap();

        let err = FsManager
            .create(&test_app.app, "web", "a: 1", &quoted(&[]), TemplateType::Yaml)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StencilError>(),
            Some(StencilError::ComponentExists { .. })
        ));
    }

    #[test]
    fn test_resolve_missing() {
        let test_app = TestApp::new("guestbook");
        let err = FsManager.resolve_path(&test_app.app, "nope").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StencilError>(),
            Some(StencilError::ComponentNotFound { .. })
        ));

        let err = FsManager.namespace(&test_app.app, "missing").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StencilError>(),
            Some(StencilError::NamespaceNotFound { .. })
        ));
    }

    #[test]
    fn test_lookup_stays_inside_components_dir() {
        let test_app = TestApp::new("guestbook");
        FsManager.create(&test_app.app, "web", "{}", &quoted(&[]), TemplateType::Json).unwrap();

        for name in ["..", "../environments/default", "a/../..", "./"] {
            let err = FsManager.namespace(&test_app.app, name).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<StencilError>(), Some(StencilError::NamespaceNotFound { .. })),
                "namespace {name:?} should not resolve"
            );
        }

        for query in ["../web", "../../guestbook/components/web", "./web"] {
            let err = FsManager.resolve_path(&test_app.app, query).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<StencilError>(), Some(StencilError::ComponentNotFound { .. })),
                "component {query:?} should not resolve"
            );
        }

        assert!(FsManager.namespace(&test_app.app, "/").is_ok());
        assert!(FsManager.resolve_path(&test_app.app, "/web").is_ok());
        assert!(!test_app.root().join("params.json").exists());
    }
}
