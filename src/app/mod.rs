//! App metadata: `app.toml`, app discovery and the on-disk layout.
//!
//! An app is a directory holding `app.toml`:
//!
//! ```toml
//! name = "guestbook"
//!
//! [environments]
//! default = { namespace = "default" }
//! prod = { namespace = "guestbook-prod" }
//!
//! [libraries]
//! shared = { path = "../shared-prototypes" }
//! ```
//!
//! `app.toml` is parsed with `toml`. Edits (adding an environment) go through
//! `toml_edit` so comments and formatting survive.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use toml_edit::DocumentMut;

use crate::config::parse_config;
use crate::constants::{APP_FILE, COMPONENTS_DIR, ENVIRONMENTS_DIR, PROTOTYPES_DIR};
use crate::core::{FileOperation, FileResultExt, StencilError};
use crate::utils::{atomic_write, ensure_dir};

/// An environment entry in `app.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    /// Namespace components are deployed into
    #[serde(default)]
    pub namespace: String,
}

/// A prototype library entry in `app.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySpec {
    /// Library directory, relative to the app root unless absolute
    pub path: String,
}

/// Parsed contents of `app.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    /// App name
    pub name: String,
    /// Environments by name
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentSpec>,
    /// Extra prototype libraries by name
    #[serde(default)]
    pub libraries: BTreeMap<String, LibrarySpec>,
}

/// A loaded app rooted at the directory holding `app.toml`.
#[derive(Debug, Clone)]
pub struct App {
    root: PathBuf,
    metadata: AppMetadata,
}

impl App {
    /// Create an app skeleton in `dir`.
    ///
    /// Writes `app.toml` and creates `components/`, `environments/` and
    /// `prototypes/`. Environments are added separately.
    ///
    /// # Errors
    ///
    /// Fails if `name` is invalid, `dir` already holds an app, or a file cannot
    /// be written.
    pub fn init(dir: &Path, name: &str) -> Result<Self> {
        validate_name("app", name)?;

        let app_file = dir.join(APP_FILE);
        if app_file.exists() {
            anyhow::bail!("An app already exists at {}", dir.display());
        }

        let metadata = AppMetadata {
            name: name.to_string(),
            ..AppMetadata::default()
        };
        write_metadata(&app_file, &metadata)?;

        for sub in [COMPONENTS_DIR, ENVIRONMENTS_DIR, PROTOTYPES_DIR] {
            ensure_dir(&dir.join(sub))?;
        }

        tracing::info!("Initialized app '{}' at {}", name, dir.display());
        Self::load(dir)
    }

    /// Load the app rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::AppNotFound`] if `root` has no `app.toml`, or
    /// [`StencilError::AppParse`] if it cannot be parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let app_file = root.join(APP_FILE);
        if !app_file.is_file() {
            return Err(StencilError::AppNotFound {
                path: root.display().to_string(),
            }
            .into());
        }

        let metadata: AppMetadata = parse_config(&app_file).map_err(|e| StencilError::AppParse {
            file: app_file.display().to_string(),
            reason: format!("{e:#}"),
        })?;

        Ok(Self {
            root: root.to_path_buf(),
            metadata,
        })
    }

    /// Find the app containing `start` by walking up to the filesystem root.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::AppNotFound`] if no ancestor holds `app.toml`.
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = Some(start);
        while let Some(dir) = current {
            if dir.join(APP_FILE).is_file() {
                tracing::debug!("Found app at {}", dir.display());
                return Self::load(dir);
            }
            current = dir.parent();
        }

        Err(StencilError::AppNotFound {
            path: start.display().to_string(),
        }
        .into())
    }

    /// Load the app at `explicit` if given, else search up from the current directory.
    ///
    /// # Errors
    ///
    /// Fails if no app is found or its metadata is invalid.
    pub fn find_with_optional(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(root) => Self::load(root),
            None => {
                let cwd = std::env::current_dir()
                    .context("Cannot determine current working directory")?;
                Self::find_from(&cwd)
            }
        }
    }

    /// The app root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The app name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Parsed `app.toml`.
    #[must_use]
    pub const fn metadata(&self) -> &AppMetadata {
        &self.metadata
    }

    /// `<root>/components`
    #[must_use]
    pub fn components_dir(&self) -> PathBuf {
        self.root.join(COMPONENTS_DIR)
    }

    /// `<root>/environments/<name>`
    #[must_use]
    pub fn environment_dir(&self, name: &str) -> PathBuf {
        self.root.join(ENVIRONMENTS_DIR).join(name)
    }

    /// The named environment.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::EnvironmentNotFound`] if it is not defined.
    pub fn environment(&self, name: &str) -> Result<&EnvironmentSpec, StencilError> {
        self.metadata.environments.get(name).ok_or_else(|| StencilError::EnvironmentNotFound {
            name: name.to_string(),
        })
    }

    /// All environments, sorted by name.
    #[must_use]
    pub const fn environments(&self) -> &BTreeMap<String, EnvironmentSpec> {
        &self.metadata.environments
    }

    /// Record a new environment in `app.toml`, preserving its formatting.
    ///
    /// # Errors
    ///
    /// Fails if the name is invalid or taken, or `app.toml` cannot be rewritten.
    pub fn add_environment(&mut self, name: &str, namespace: &str) -> Result<()> {
        validate_name("environment", name)?;
        if self.metadata.environments.contains_key(name) {
            return Err(StencilError::EnvironmentExists {
                name: name.to_string(),
            }
            .into());
        }

        let app_file = self.root.join(APP_FILE);
        let content = std::fs::read_to_string(&app_file).with_file_context(
            FileOperation::Read,
            &app_file,
            "adding environment",
        )?;
        let mut doc: DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
            StencilError::AppParse {
                file: app_file.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let environments = doc
            .entry("environments")
            .or_insert_with(toml_edit::table)
            .as_table_like_mut()
            .ok_or_else(|| StencilError::AppParse {
                file: app_file.display().to_string(),
                reason: "'environments' is not a table".to_string(),
            })?;

        let mut entry = toml_edit::InlineTable::new();
        entry.insert("namespace", namespace.into());
        environments.insert(name, toml_edit::value(entry));

        atomic_write(&app_file, doc.to_string().as_bytes())?;

        self.metadata.environments.insert(
            name.to_string(),
            EnvironmentSpec {
                namespace: namespace.to_string(),
            },
        );
        Ok(())
    }

    /// Prototype library directories: `<root>/prototypes`, then `[libraries]`.
    #[must_use]
    pub fn library_dirs(&self) -> Vec<PathBuf> {
        std::iter::once(self.root.join(PROTOTYPES_DIR))
            .chain(self.metadata.libraries.values().map(|lib| self.root.join(&lib.path)))
            .collect()
    }
}

/// Serialize metadata with top-level maps as `[section]` headers.
fn write_metadata(path: &Path, metadata: &AppMetadata) -> Result<()> {
    let mut doc = toml_edit::ser::to_document(metadata)
        .context("Failed to serialize app metadata to TOML")?;

    for (_key, value) in doc.iter_mut() {
        if let Some(inline) = value.as_inline_table() {
            let mut table = inline.clone().into_table();
            table.set_implicit(false);
            *value = toml_edit::Item::Table(table);
        }
    }

    atomic_write(path, doc.to_string().as_bytes())
}

/// The compiled name pattern; `None` only if the constant pattern is malformed.
fn name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*(/[A-Za-z0-9][A-Za-z0-9_.-]*)*$")
                .inspect_err(|e| tracing::error!("Name pattern failed to compile: {e}"))
                .ok()
        })
        .as_ref()
}

/// Check an app, environment, component or namespace name.
///
/// Names are slash-separated segments of letters, digits, `_`, `.` and `-`,
/// each starting with a letter or digit.
///
/// # Errors
///
/// Returns [`StencilError::InvalidOption`] naming `kind` if the name is malformed.
pub fn validate_name(kind: &str, name: &str) -> Result<(), StencilError> {
    let well_formed = name_pattern().is_some_and(|re| re.is_match(name));
    if well_formed && !name.split('/').any(|seg| seg == "." || seg == "..") {
        Ok(())
    } else {
        Err(StencilError::InvalidOption {
            name: kind.to_string(),
            reason: format!("{name:?} is not a valid {kind} name"),
        })
    }
}
