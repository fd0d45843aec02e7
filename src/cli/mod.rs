//! Command-line interface for Stencil.
//!
//! Each subcommand lives in its own module and turns its arguments into an
//! [`Options`](crate::actions::Options) bag for the matching action.
//!
//! # Command Structure
//!
//! ```text
//! stencil [-v|-q] [--app-dir DIR] [--config FILE] <command>
//!   init <name> [--dir DIR]
//!   prototype list|search|describe|preview|use
//!   param set <component> <path> <value> [--index N] [--global] [--env ENV]
//!   env list|add
//! ```
//!
//! # Logging
//!
//! `RUST_LOG` wins when set. Otherwise `--verbose` selects `debug`, `--quiet`
//! selects `error`, and the default is `warn`. Logs go to stderr.

mod env;
mod init;
mod param;
mod prototype;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::GlobalConfig;

/// Settings shared by every command, derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,

    /// Explicit global config file (`--config`)
    pub config_path: Option<PathBuf>,

    /// Explicit app root (`--app-dir`)
    pub app_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Install the tracing subscriber. Safe to call more than once.
    pub fn init_logging(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// The app named by `--app-dir`, or the one containing the current directory.
    ///
    /// # Errors
    ///
    /// Fails if no app is found or `app.toml` is invalid.
    pub fn load_app(&self) -> Result<App> {
        App::find_with_optional(self.app_dir.as_deref())
    }

    /// Global configuration from `--config`, `STENCIL_CONFIG` or the default path.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be parsed.
    pub fn load_global_config(&self) -> Result<GlobalConfig> {
        GlobalConfig::load_with_optional(self.config_path.clone())
    }
}

/// Stencil: generate application components from parameterized prototypes.
#[derive(Parser)]
#[command(
    name = "stencil",
    about = "Generate application components from parameterized prototypes",
    version,
    long_about = "Stencil instantiates prototypes (parameterized Jsonnet, JSON and YAML templates) \
                  into components of an app, and manages component, namespace and environment parameters."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// App root directory (default: search upward from the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    app_dir: Option<PathBuf>,

    /// Global config file (default: ~/.stencil/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new app
    Init(init::InitCommand),

    /// List, inspect and instantiate prototypes
    Prototype(prototype::PrototypeCommand),

    /// Change component, namespace and environment parameters
    Param(param::ParamCommand),

    /// List and add environments
    Env(env::EnvCommand),
}

impl Cli {
    /// Run the selected command.
    ///
    /// # Errors
    ///
    /// Returns the command's error; the binary reports it with
    /// [`user_friendly_error`](crate::core::user_friendly_error).
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(&config)
    }

    /// Derive the shared settings from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
            app_dir: self.app_dir.clone(),
        }
    }

    /// Run the selected command with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub fn execute_with_config(self, config: &CliConfig) -> Result<()> {
        match self.command {
            Commands::Init(cmd) => cmd.execute(),
            Commands::Prototype(cmd) => cmd.execute(config),
            Commands::Param(cmd) => cmd.execute(config),
            Commands::Env(cmd) => cmd.execute(config),
        }
    }
}
