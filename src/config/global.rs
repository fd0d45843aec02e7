//! Global user configuration (`~/.stencil/config.toml`).
//!
//! The global config lists prototype library directories shared by every app
//! on the machine. It is optional: a missing file means defaults.
//!
//! # Location
//!
//! - **Unix/macOS**: `~/.stencil/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\stencil\config.toml`
//! - **Override**: `--config <FILE>` or the `STENCIL_CONFIG` environment variable
//!
//! # File Format
//!
//! ```toml
//! # Extra prototype libraries, searched after the built-in and app prototypes
//! prototype_paths = ["~/prototypes", "/opt/company/prototypes"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::parser::parse_config;
use crate::constants::CONFIG_ENV_VAR;
use crate::utils::atomic_write;

/// Global configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Extra prototype library directories. `~` and `$VAR` are expanded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prototype_paths: Vec<String>,
}

impl GlobalConfig {
    /// Load from the default location, or return defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_with_optional(None)
    }

    /// Load from `path` if given, else from [`resolve_path`](Self::resolve_path).
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::resolve_path()?,
        };

        if path.exists() {
            tracing::debug!("Loading global config from {}", path.display());
            Self::load_from(&path)
        } else {
            tracing::debug!("No global config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        parse_config(path)
            .with_context(|| format!("Failed to load global config from {}", path.display()))
    }

    /// Save to a specific file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize global config")?;
        atomic_write(path, content.as_bytes())
    }

    /// The config path honoring the `STENCIL_CONFIG` override.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the home directory cannot be determined.
    pub fn resolve_path() -> Result<PathBuf> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
            _ => Self::default_path(),
        }
    }

    /// The platform default config path.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("stencil")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".stencil")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Prototype library directories with `~` and environment variables expanded.
    ///
    /// Entries that fail to expand are skipped with a warning.
    #[must_use]
    pub fn expanded_prototype_paths(&self) -> Vec<PathBuf> {
        self.prototype_paths
            .iter()
            .filter_map(|raw| match shellexpand::full(raw) {
                Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
                Err(e) => {
                    tracing::warn!("Ignoring prototype path '{}': {}", raw, e);
                    None
                }
            })
            .collect()
    }
}
