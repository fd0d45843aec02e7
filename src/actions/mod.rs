//! User-facing operations.
//!
//! Each action is constructed from an [`Options`] bag and validated at
//! construction time: a missing or mistyped option fails `new`, never `run`.
//!
//! ```rust,no_run
//! use stencil_cli::actions::{OPTION_APP, OPTION_ARGUMENTS, Options, PrototypeUse};
//! use stencil_cli::app::App;
//!
//! # fn example() -> anyhow::Result<()> {
//! let app = App::find_with_optional(None)?;
//! let options = Options::new()
//!     .with(OPTION_APP, app)
//!     .with(OPTION_ARGUMENTS, vec!["single-port-deployment".to_string(), "web".to_string()]);
//! PrototypeUse::new(options)?.run()?;
//! # Ok(())
//! # }
//! ```

pub mod init;
pub mod param_set;
pub mod prototype;
pub mod prototype_use;

use std::collections::HashMap;

use crate::app::App;
use crate::config::GlobalConfig;
use crate::core::StencilError;

pub use init::init_app;
pub use param_set::{ParamSet, ParamTarget};
pub use prototype::{OutputFormat, PrototypeDescribe, PrototypeList, PrototypePreview, PrototypeSearch};
pub use prototype_use::PrototypeUse;

/// The app to operate on.
pub const OPTION_APP: &str = "app";
/// Global configuration (defaults apply when absent).
pub const OPTION_CONFIG: &str = "config";
/// Raw positional arguments and prototype flags.
pub const OPTION_ARGUMENTS: &str = "arguments";
/// Component (or, with `global`, namespace) name.
pub const OPTION_NAME: &str = "name";
/// Dotted parameter path.
pub const OPTION_PATH: &str = "path";
/// Raw parameter value.
pub const OPTION_VALUE: &str = "value";
/// Target the namespace's global parameters.
pub const OPTION_GLOBAL: &str = "global";
/// Target an environment's overrides.
pub const OPTION_ENV_NAME: &str = "env-name";
/// Array element index.
pub const OPTION_INDEX: &str = "index";
/// Prototype search or lookup query.
pub const OPTION_QUERY: &str = "query";
/// Listing output format (`table`, `json` or `yaml`).
pub const OPTION_FORMAT: &str = "format";

/// A single option value.
#[derive(Debug, Clone)]
pub enum OptionValue {
    /// A loaded app
    App(Box<App>),
    /// Global configuration
    Config(GlobalConfig),
    /// A string
    String(String),
    /// A list of strings
    Strings(Vec<String>),
    /// A flag
    Bool(bool),
    /// A non-negative integer
    Int(usize),
}

impl OptionValue {
    const fn kind(&self) -> &'static str {
        match self {
            Self::App(_) => "app",
            Self::Config(_) => "config",
            Self::String(_) => "string",
            Self::Strings(_) => "string list",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
        }
    }
}

impl From<App> for OptionValue {
    fn from(app: App) -> Self {
        Self::App(Box::new(app))
    }
}

impl From<GlobalConfig> for OptionValue {
    fn from(config: GlobalConfig) -> Self {
        Self::Config(config)
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(values: Vec<String>) -> Self {
        Self::Strings(values)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<usize> for OptionValue {
    fn from(value: usize) -> Self {
        Self::Int(value)
    }
}

/// Options passed to an action constructor.
#[derive(Debug, Clone, Default)]
pub struct Options {
    values: HashMap<&'static str, OptionValue>,
}

impl Options {
    /// An empty option bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option.
    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl Into<OptionValue>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// Add an option only when `value` is `Some`.
    #[must_use]
    pub fn with_optional<V: Into<OptionValue>>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub(crate) const fn loader(self) -> OptionLoader {
        OptionLoader {
            options: self,
        }
    }
}

/// Typed access to an [`Options`] bag; values are moved out as they are loaded.
pub(crate) struct OptionLoader {
    options: Options,
}

impl OptionLoader {
    fn take(&mut self, key: &'static str) -> Option<OptionValue> {
        self.options.values.remove(key)
    }

    fn mismatch(key: &str, expected: &str, got: &OptionValue) -> StencilError {
        StencilError::InvalidOption {
            name: key.to_string(),
            reason: format!("expected {expected}, got {}", got.kind()),
        }
    }

    fn missing(key: &str) -> StencilError {
        StencilError::MissingOption {
            name: key.to_string(),
        }
    }

    pub(crate) fn app(&mut self) -> Result<App, StencilError> {
        match self.take(OPTION_APP) {
            Some(OptionValue::App(app)) => Ok(*app),
            Some(other) => Err(Self::mismatch(OPTION_APP, "app", &other)),
            None => Err(Self::missing(OPTION_APP)),
        }
    }

    pub(crate) fn optional_config(&mut self) -> Result<GlobalConfig, StencilError> {
        match self.take(OPTION_CONFIG) {
            Some(OptionValue::Config(config)) => Ok(config),
            Some(other) => Err(Self::mismatch(OPTION_CONFIG, "config", &other)),
            None => Ok(GlobalConfig::default()),
        }
    }

    pub(crate) fn string(&mut self, key: &'static str) -> Result<String, StencilError> {
        self.optional_string(key)?.ok_or_else(|| Self::missing(key))
    }

    pub(crate) fn optional_string(&mut self, key: &'static str) -> Result<Option<String>, StencilError> {
        match self.take(key) {
            Some(OptionValue::String(value)) => Ok(Some(value)),
            Some(other) => Err(Self::mismatch(key, "string", &other)),
            None => Ok(None),
        }
    }

    pub(crate) fn strings(&mut self, key: &'static str) -> Result<Vec<String>, StencilError> {
        match self.take(key) {
            Some(OptionValue::Strings(values)) => Ok(values),
            Some(other) => Err(Self::mismatch(key, "string list", &other)),
            None => Err(Self::missing(key)),
        }
    }

    pub(crate) fn optional_bool(&mut self, key: &'static str) -> Result<bool, StencilError> {
        match self.take(key) {
            Some(OptionValue::Bool(value)) => Ok(value),
            Some(other) => Err(Self::mismatch(key, "bool", &other)),
            None => Ok(false),
        }
    }

    pub(crate) fn optional_int(&mut self, key: &'static str) -> Result<Option<usize>, StencilError> {
        match self.take(key) {
            Some(OptionValue::Int(value)) => Ok(Some(value)),
            Some(other) => Err(Self::mismatch(key, "integer", &other)),
            None => Ok(None),
        }
    }
}
