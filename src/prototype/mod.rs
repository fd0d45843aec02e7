//! Prototypes: named, parameterized templates for generating one component.
//!
//! - [`param`] - parameter schemas and literal quoting
//! - [`parser`] - the annotated-header prototype file format
//! - [`system`] - prototypes built into the binary
//! - [`catalog`] - the read-only set of loaded prototypes and query resolution
//! - [`flags`] - binding a prototype's schema to a command-line flag surface
//! - [`values`] - the values-file and flag extractors and the value resolver

pub mod catalog;
pub mod flags;
pub mod param;
pub mod parser;
pub mod system;
pub mod values;

use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::StencilError;

pub use catalog::{Catalog, SearchMode};
pub use flags::{BoundFlags, bind_flags};
pub use param::{ParamSchema, ParamSchemas, ParamType};
pub use parser::parse_prototype;
pub use values::{FileValues, FlagValues, QuotedValues, ValueExtractor, resolve_values};

/// The document language a prototype body renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    /// Jsonnet source; not validated after rendering
    Jsonnet,
    /// JSON document
    Json,
    /// YAML document
    Yaml,
}

impl TemplateType {
    /// File extension for generated components.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Jsonnet => "jsonnet",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Template type implied by a file's extension, if any.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "jsonnet" | "libsonnet" => Some(Self::Jsonnet),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// All template types, in extension lookup order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Jsonnet, Self::Json, Self::Yaml]
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TemplateType {
    type Err = StencilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jsonnet" => Ok(Self::Jsonnet),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(StencilError::InvalidTemplateType {
                name: s.to_string(),
            }),
        }
    }
}

/// A loaded prototype. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prototype {
    /// Fully qualified name, e.g. `io.stencil.pkg.single-port-deployment`
    pub name: String,
    /// Definition format version
    #[serde(rename = "apiVersion")]
    pub api_version: semver::Version,
    /// Long description
    pub description: String,
    /// One-line description for listings
    #[serde(rename = "shortDescription")]
    pub short_description: String,
    /// Declared parameters, in declaration order
    pub params: ParamSchemas,
    /// Document language of [`body`](Self::body)
    #[serde(rename = "templateType")]
    pub template_type: TemplateType,
    /// Raw template text
    #[serde(skip)]
    pub body: String,
    /// Where the definition came from (file path or `builtin:<file>`)
    #[serde(skip)]
    pub origin: String,
}

impl Prototype {
    /// The last dot-separated segment of the name.
    ///
    /// ```
    /// # use stencil_cli::prototype::system::system_prototypes;
    /// let protos = system_prototypes().unwrap();
    /// let deployment = protos.iter().find(|p| p.short_name() == "single-port-deployment");
    /// assert!(deployment.is_some());
    /// ```
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}
