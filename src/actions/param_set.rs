//! `param set`: change one parameter in one of three scopes.
//!
//! | Scope       | Selected by     | Addressing                                     |
//! |-------------|-----------------|------------------------------------------------|
//! | component   | (default)       | dotted path inside the component's parameters  |
//! | namespace   | `--global`      | dotted path inside the namespace's `global`    |
//! | environment | `--env <name>`  | flat: the whole path is one parameter name     |
//!
//! `--env` and `--global` together are rejected when the action is built.

use anyhow::{Context, Result};
use std::collections::BTreeMap;

use super::{
    OPTION_ENV_NAME, OPTION_GLOBAL, OPTION_INDEX, OPTION_NAME, OPTION_PATH, OPTION_VALUE, Options,
};
use crate::app::App;
use crate::component::{ComponentManager, FsManager, ParamOptions, parse_path};
use crate::core::StencilError;
use crate::env;
use crate::params::decode_value;

/// Writes flat environment overrides: `(app, env, component, literals)`.
pub type EnvSetter = Box<dyn Fn(&App, &str, &str, &BTreeMap<String, String>) -> Result<()>>;

/// Where a parameter is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamTarget {
    /// A component's own parameters.
    Local {
        /// `module/component`
        component: String,
        /// Dotted path, split
        path: Vec<String>,
        /// Array element index
        index: Option<usize>,
    },
    /// A namespace's global parameters.
    Global {
        /// Namespace name; empty for the root
        namespace: String,
        /// Dotted path, split
        path: Vec<String>,
    },
    /// A component's override in one environment.
    Environment {
        /// Environment name
        env: String,
        /// `module/component`
        component: String,
        /// Flat parameter name (the raw path, unsplit)
        param: String,
    },
}

impl ParamTarget {
    /// Choose and validate a scope.
    ///
    /// # Errors
    ///
    /// - [`StencilError::ConflictingScope`] when both `env` and `global` are set
    /// - [`StencilError::InvalidOption`] when `index` is given outside the component scope
    /// - [`StencilError::InvalidPath`] for an empty path or path segment
    pub fn new(
        name: &str,
        raw_path: &str,
        global: bool,
        env: Option<&str>,
        index: Option<usize>,
    ) -> Result<Self, StencilError> {
        let env = env.filter(|e| !e.is_empty());
        if env.is_some() && global {
            return Err(StencilError::ConflictingScope);
        }
        if index.is_some() && (env.is_some() || global) {
            return Err(StencilError::InvalidOption {
                name: OPTION_INDEX.to_string(),
                reason: "an index can only be used when setting a component parameter".to_string(),
            });
        }

        if let Some(env) = env {
            if raw_path.is_empty() {
                return Err(StencilError::InvalidPath {
                    path: raw_path.to_string(),
                });
            }
            return Ok(Self::Environment {
                env: env.to_string(),
                component: name.to_string(),
                param: raw_path.to_string(),
            });
        }

        let path = parse_path(raw_path)?;
        if global {
            Ok(Self::Global {
                namespace: name.to_string(),
                path,
            })
        } else {
            Ok(Self::Local {
                component: name.to_string(),
                path,
                index,
            })
        }
    }
}

/// Sets a parameter in the component, namespace or environment scope.
pub struct ParamSet {
    app: App,
    target: ParamTarget,
    raw_value: String,
    manager: Box<dyn ComponentManager>,
    set_env: EnvSetter,
}

impl std::fmt::Debug for ParamSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamSet")
            .field("app", &self.app.name())
            .field("target", &self.target)
            .field("raw_value", &self.raw_value)
            .finish_non_exhaustive()
    }
}

impl ParamSet {
    /// Build the action from `app`, `name`, `path`, `value` and the optional
    /// `global`, `env-name` and `index`.
    ///
    /// # Errors
    ///
    /// Fails if a required option is missing or mistyped, or the scope
    /// options conflict (see [`ParamTarget::new`]).
    pub fn new(options: Options) -> Result<Self, StencilError> {
        let mut loader = options.loader();
        let app = loader.app()?;
        let name = loader.string(OPTION_NAME)?;
        let path = loader.string(OPTION_PATH)?;
        let raw_value = loader.string(OPTION_VALUE)?;
        let global = loader.optional_bool(OPTION_GLOBAL)?;
        let env = loader.optional_string(OPTION_ENV_NAME)?;
        let index = loader.optional_int(OPTION_INDEX)?;

        let target = ParamTarget::new(&name, &path, global, env.as_deref(), index)?;

        Ok(Self {
            app,
            target,
            raw_value,
            manager: Box::new(FsManager),
            set_env: Box::new(env::set_params),
        })
    }

    /// The chosen scope.
    #[must_use]
    pub const fn target(&self) -> &ParamTarget {
        &self.target
    }

    /// Replace the component manager.
    #[must_use]
    pub fn with_manager(mut self, manager: Box<dyn ComponentManager>) -> Self {
        self.manager = manager;
        self
    }

    /// Replace the environment override writer.
    #[must_use]
    pub fn with_env_setter(mut self, set_env: EnvSetter) -> Self {
        self.set_env = set_env;
        self
    }

    /// Decode the value and write it to the chosen scope.
    ///
    /// # Errors
    ///
    /// Fails with the stage that failed as context: `value is invalid`,
    /// `retrieve namespace`, `set global param`, `could not find component`
    /// or `set param`.
    pub fn run(&self) -> Result<()> {
        let value = decode_value(&self.raw_value).context("value is invalid")?;

        match &self.target {
            ParamTarget::Environment {
                env,
                component,
                param,
            } => {
                let params = BTreeMap::from([(param.clone(), value.literal())]);
                (self.set_env)(&self.app, env, component, &params)
            }
            ParamTarget::Global {
                namespace,
                path,
            } => {
                let ns = self.manager.namespace(&self.app, namespace).context("retrieve namespace")?;
                ns.set_global_param(path, value.to_json()).context("set global param")
            }
            ParamTarget::Local {
                component,
                path,
                index,
            } => {
                let (_, component) =
                    self.manager.resolve_path(&self.app, component).context("could not find component")?;
                component
                    .set_param(
                        path,
                        value.to_json(),
                        &ParamOptions {
                            index: *index,
                        },
                    )
                    .context("set param")
            }
        }
    }
}
