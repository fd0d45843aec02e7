//! The prototype catalog: every prototype available to one invocation.
//!
//! Prototypes come from three places, loaded in this order:
//!
//! 1. Built-in system prototypes
//! 2. The app's prototype libraries (`prototypes/` plus `[libraries]` in `app.toml`)
//! 3. Directories listed in the global config's `prototype_paths`
//!
//! A name may only be defined once across all of them.
//!
//! # Query Resolution
//!
//! [`Catalog::find_unique`] resolves a user query to exactly one prototype:
//! an exact name wins, then suffix matches, then substring matches. Zero
//! matches is [`StencilError::PrototypeNotFound`] (with close names as
//! suggestions); more than one is [`StencilError::AmbiguousPrototype`].

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use strsim::levenshtein;
use walkdir::WalkDir;

use super::system::system_prototypes;
use super::{Prototype, TemplateType, parse_prototype};
use crate::app::App;
use crate::config::GlobalConfig;
use crate::core::{FileOperation, FileResultExt, StencilError};

/// Maximum edit distance, as a percentage of the query length, for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// How a search query is matched against prototype names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Name starts with the query
    Prefix,
    /// Name ends with the query
    Suffix,
    /// Name contains the query
    Substring,
}

impl SearchMode {
    fn matches(self, name: &str, query: &str) -> bool {
        match self {
            Self::Prefix => name.starts_with(query),
            Self::Suffix => name.ends_with(query),
            Self::Substring => name.contains(query),
        }
    }
}

/// A read-only, name-sorted set of prototypes.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    prototypes: Vec<Prototype>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate names.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::DuplicatePrototype`] if two prototypes share a name.
    pub fn new(mut prototypes: Vec<Prototype>) -> Result<Self, StencilError> {
        let mut seen = HashSet::new();
        for proto in &prototypes {
            if !seen.insert(proto.name.as_str()) {
                return Err(StencilError::DuplicatePrototype {
                    name: proto.name.clone(),
                });
            }
        }

        prototypes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self {
            prototypes,
        })
    }

    /// Catalog holding only the built-in prototypes.
    ///
    /// # Errors
    ///
    /// Only fails if an embedded definition is malformed.
    pub fn system() -> Result<Self, StencilError> {
        Self::new(system_prototypes()?)
    }

    /// Catalog for an app: built-ins, app libraries, then global prototype paths.
    ///
    /// Missing library directories are skipped with a debug log.
    ///
    /// # Errors
    ///
    /// Returns an error if a prototype file cannot be read or parsed, or if a
    /// name is defined twice.
    pub fn for_app(app: &App, config: &GlobalConfig) -> Result<Self> {
        let mut prototypes = system_prototypes()?;

        let dirs = app.library_dirs().into_iter().chain(config.expanded_prototype_paths());
        for dir in dirs {
            if dir.is_dir() {
                prototypes.extend(load_dir(&dir)?);
            } else {
                tracing::debug!("Skipping missing prototype library {}", dir.display());
            }
        }

        tracing::debug!("Loaded {} prototypes", prototypes.len());
        Ok(Self::new(prototypes)?)
    }

    /// All prototypes, sorted by name.
    #[must_use]
    pub fn list(&self) -> &[Prototype] {
        &self.prototypes
    }

    /// Prototypes whose names match `query` under `mode`.
    #[must_use]
    pub fn search(&self, query: &str, mode: SearchMode) -> Vec<&Prototype> {
        self.prototypes.iter().filter(|p| mode.matches(&p.name, query)).collect()
    }

    /// Resolve a query to exactly one prototype.
    ///
    /// # Errors
    ///
    /// - [`StencilError::PrototypeNotFound`] when nothing matches
    /// - [`StencilError::AmbiguousPrototype`] when several names match equally well
    pub fn find_unique(&self, query: &str) -> Result<&Prototype, StencilError> {
        if let Some(exact) = self.prototypes.iter().find(|p| p.name == query) {
            return Ok(exact);
        }

        for mode in [SearchMode::Suffix, SearchMode::Substring] {
            let found = self.search(query, mode);
            match found.as_slice() {
                [] => continue,
                [only] => return Ok(*only),
                many => {
                    return Err(StencilError::AmbiguousPrototype {
                        query: query.to_string(),
                        matches: many.iter().map(|p| p.name.clone()).collect(),
                    });
                }
            }
        }

        Err(StencilError::PrototypeNotFound {
            query: query.to_string(),
            suggestions: self.suggestions(query),
        })
    }

    /// Up to three names closest to `query`, compared on short names.
    fn suggestions(&self, query: &str) -> Vec<String> {
        let max_distance = query.len() * SIMILARITY_THRESHOLD_PERCENT / 100;

        let mut scored: Vec<(usize, &str)> = self
            .prototypes
            .iter()
            .map(|p| (levenshtein(query, p.short_name()), p.name.as_str()))
            .filter(|(distance, _)| *distance <= max_distance)
            .collect();
        scored.sort();

        scored.into_iter().take(3).map(|(_, name)| name.to_string()).collect()
    }
}

/// Parse every prototype file under `dir`, recursively.
///
/// Files are recognized by extension (`.jsonnet`, `.json`, `.yaml`, `.yml`).
/// Hidden files and directories are skipped.
///
/// # Errors
///
/// Returns an error if a file cannot be read or is not a valid prototype.
pub fn load_dir(dir: &Path) -> Result<Vec<Prototype>> {
    let mut prototypes = Vec::new();

    let walker = WalkDir::new(dir).sort_by_file_name().into_iter().filter_entry(|entry| {
        entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
    });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(template_type) = TemplateType::from_path(entry.path()) else {
            continue;
        };

        let text = std::fs::read_to_string(entry.path()).with_file_context(
            FileOperation::Read,
            entry.path(),
            "loading prototype",
        )?;
        let proto = parse_prototype(&entry.path().display().to_string(), &text, template_type)?;
        tracing::debug!("Loaded prototype {} from {}", proto.name, entry.path().display());
        prototypes.push(proto);
    }

    Ok(prototypes)
}
