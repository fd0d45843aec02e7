//! File system helpers with atomic writes.
//!
//! Every generated artifact and parameter document is written through
//! [`atomic_write`], so a crash mid-write never leaves a truncated file behind.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::core::{FileOperation, FileResultExt};

/// Ensures a directory exists, creating it and its parents if necessary.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or if it
/// cannot be created.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            anyhow::bail!("Path exists but is not a directory: {}", path.display());
        }
        return Ok(());
    }

    fs::create_dir_all(path).with_file_context(
        FileOperation::CreateDir,
        path,
        "creating directory",
    )?;
    Ok(())
}

/// Writes `content` to `path` atomically.
///
/// The content goes to a temporary file in the same directory, is synced to
/// disk, then renamed over the destination. Parent directories are created.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, written, or
/// renamed into place.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_dir(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

    temp.write_all(content)
        .with_context(|| format!("Failed to write temp file for: {}", path.display()))?;
    temp.as_file().sync_all().context("Failed to sync file to disk")?;

    temp.persist(path)
        .map_err(|e| e.error)
        .with_file_context(FileOperation::Write, path, "replacing file atomically")?;

    tracing::debug!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

/// Reads and parses a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON for `T`.
pub fn read_json_file<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = fs::read_to_string(path).with_file_context(
        FileOperation::Read,
        path,
        "reading JSON document",
    )?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from file: {}", path.display()))
}

/// Serializes `data` as pretty JSON (with a trailing newline) and writes it atomically.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json_file<T>(path: &Path, data: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let mut json = serde_json::to_string_pretty(data)
        .with_context(|| format!("Failed to serialize data to JSON for: {}", path.display()))?;
    json.push('\n');

    atomic_write(path, json.as_bytes())
}
