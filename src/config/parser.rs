//! Generic TOML parsing with file path context.
//!
//! Used for both the global config and `app.toml`, so every parse failure
//! names the file it came from.
//!
//! ```text
//! Failed to parse TOML file: /path/to/app.toml
//! Caused by:
//!     invalid type: integer `1`, expected a string
//! ```

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::core::{FileOperation, FileResultExt};

/// Parse a TOML file into `T`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not deserialize into `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = std::fs::read_to_string(path).with_file_context(
        FileOperation::Read,
        path,
        "reading TOML configuration",
    )?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML file: {}", path.display()))
}
