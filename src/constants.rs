//! Names shared across modules: reserved flags and the on-disk app layout.

/// Flag holding the path of a `key=value` values file.
pub const OPTION_VALUES_FILE: &str = "values-file";

/// Flag (and parameter) holding the component name.
pub const OPTION_NAME: &str = "name";

/// App metadata file at the root of every app.
pub const APP_FILE: &str = "app.toml";

/// Directory holding generated components and their namespace documents.
pub const COMPONENTS_DIR: &str = "components";

/// Directory holding per-environment override tables.
pub const ENVIRONMENTS_DIR: &str = "environments";

/// Default prototype library directory inside an app.
pub const PROTOTYPES_DIR: &str = "prototypes";

/// Parameter document file name, used by namespaces and environments alike.
pub const PARAMS_FILE: &str = "params.json";

/// Environment created by `stencil init`.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Environment variable overriding the global config location.
pub const CONFIG_ENV_VAR: &str = "STENCIL_CONFIG";
