//! Namespaces (component modules) and the components inside them.
//!
//! A namespace is a directory under `components/`; the root namespace is
//! `components/` itself. Each namespace keeps one parameter document,
//! `params.json`:
//!
//! ```json
//! {
//!   "global": { "replicas": 2 },
//!   "components": {
//!     "web": { "name": "web", "image": "nginx", "replicas": 1, "containerPort": 80 }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::document::{ParamOptions, set_path};
use crate::app::App;
use crate::constants::PARAMS_FILE;
use crate::prototype::TemplateType;
use crate::utils::{read_json_file, write_json_file};

/// Contents of a namespace's `params.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceParams {
    /// Parameters shared by every component of the namespace
    #[serde(default)]
    pub global: Map<String, Value>,
    /// Parameters of each component, by component name
    #[serde(default)]
    pub components: Map<String, Value>,
}

/// A namespace inside an app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    name: String,
    dir: PathBuf,
}

impl Namespace {
    /// The namespace called `name`; `""` and `"/"` are the root. Not checked for existence.
    #[must_use]
    pub fn new(app: &App, name: &str) -> Self {
        let name = name.trim_matches('/');
        let dir = if name.is_empty() {
            app.components_dir()
        } else {
            app.components_dir().join(name)
        };

        Self {
            name: name.to_string(),
            dir,
        }
    }

    /// The root namespace.
    #[must_use]
    pub fn root(app: &App) -> Self {
        Self::new(app, "")
    }

    /// Namespace name; empty for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name, `/` for the root.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { "/" } else { &self.name }
    }

    /// Directory holding the namespace's components.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the namespace's `params.json`.
    #[must_use]
    pub fn params_path(&self) -> PathBuf {
        self.dir.join(PARAMS_FILE)
    }

    /// Whether the namespace directory exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// Load `params.json`, or an empty document if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is not a valid parameter document.
    pub fn load_params(&self) -> Result<NamespaceParams> {
        let path = self.params_path();
        if !path.exists() {
            return Ok(NamespaceParams::default());
        }
        read_json_file(&path)
            .with_context(|| format!("Failed to load params for namespace '{}'", self.display_name()))
    }

    /// Write `params.json` atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save_params(&self, params: &NamespaceParams) -> Result<()> {
        write_json_file(&self.params_path(), params)
    }

    /// Set a namespace-wide parameter. The path is resolved inside `global`.
    ///
    /// # Errors
    ///
    /// Fails if the document cannot be loaded or saved, or the path cannot be resolved.
    pub fn set_global_param(&self, path: &[String], value: Value) -> Result<()> {
        let mut params = self.load_params()?;

        let mut global = Value::Object(std::mem::take(&mut params.global));
        set_path(&mut global, path, value, &ParamOptions::default())?;
        if let Value::Object(map) = global {
            params.global = map;
        }

        self.save_params(&params)?;
        tracing::info!("Set global param {} in namespace '{}'", path.join("."), self.display_name());
        Ok(())
    }

    /// Components in this namespace (not its children), sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn components(&self) -> Result<Vec<Component>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let mut components = Vec::new();
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read {}", self.dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.file_name().is_some_and(|n| n == PARAMS_FILE) {
                continue;
            }
            if let (Some(_), Some(stem)) =
                (TemplateType::from_path(&path), path.file_stem().and_then(|s| s.to_str()))
            {
                components.push(Component::new(self.clone(), stem, path.clone()));
            }
        }

        components.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(components)
    }

    /// The component called `name` in this namespace, if a file for it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn find_component(&self, name: &str) -> Result<Option<Component>> {
        Ok(self.components()?.into_iter().find(|c| c.name == name))
    }
}

/// A generated component: one rendered file plus its entry in the namespace document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    namespace: Namespace,
    name: String,
    path: PathBuf,
}

impl Component {
    /// A component handle; does not touch the filesystem.
    pub fn new(namespace: Namespace, name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            namespace,
            name: name.into(),
            path,
        }
    }

    /// Component name (leaf, without the namespace).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the rendered file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Owning namespace.
    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The component's current parameters.
    ///
    /// # Errors
    ///
    /// Fails if the namespace document cannot be loaded.
    pub fn params(&self) -> Result<Value> {
        let params = self.namespace.load_params()?;
        Ok(params.components.get(&self.name).cloned().unwrap_or_else(|| Value::Object(Map::new())))
    }

    /// Set one of the component's parameters by dotted path.
    ///
    /// # Errors
    ///
    /// Fails if the document cannot be loaded or saved, or the path cannot be resolved.
    pub fn set_param(&self, path: &[String], value: Value, options: &ParamOptions) -> Result<()> {
        let mut params = self.namespace.load_params()?;

        let entry =
            params.components.entry(self.name.clone()).or_insert_with(|| Value::Object(Map::new()));
        set_path(entry, path, value, options)?;

        self.namespace.save_params(&params)?;
        tracing::info!("Set param {} on component '{}'", path.join("."), self.name);
        Ok(())
    }
}
