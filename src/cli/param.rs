//! `stencil param set`
//!
//! ```bash
//! stencil param set web replicas 3                     # component parameter
//! stencil param set web containers.image nginx --index 0
//! stencil param set / replicas 2 --global              # root namespace
//! stencil param set web replicas 5 --env prod          # environment override
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use super::CliConfig;
use crate::actions::{
    OPTION_APP, OPTION_ENV_NAME, OPTION_GLOBAL, OPTION_INDEX, OPTION_NAME, OPTION_PATH, OPTION_VALUE,
    Options, ParamSet,
};

/// `stencil param`
#[derive(Args)]
pub struct ParamCommand {
    #[command(subcommand)]
    pub(super) command: ParamSubcommand,
}

#[derive(Subcommand)]
pub(super) enum ParamSubcommand {
    /// Set a parameter for a component, a namespace or an environment
    Set(SetArgs),
}

#[derive(Args)]
pub(super) struct SetArgs {
    /// Component (`module/component`), or the namespace with --global
    pub(super) component: String,

    /// Dotted parameter path, e.g. `metadata.labels.tier`
    pub(super) path: String,

    /// New value: JSON literal or bare string
    #[arg(allow_hyphen_values = true)]
    pub(super) value: String,

    /// Array element to update when the path reaches an array
    #[arg(long)]
    pub(super) index: Option<usize>,

    /// Set the namespace's global parameter instead of a component's
    #[arg(long)]
    pub(super) global: bool,

    /// Set the override in this environment instead
    #[arg(long, value_name = "ENV")]
    pub(super) env: Option<String>,
}

impl ParamCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        match self.command {
            ParamSubcommand::Set(args) => args.execute(config),
        }
    }
}

impl SetArgs {
    fn execute(self, config: &CliConfig) -> Result<()> {
        let options = Options::new()
            .with(OPTION_APP, config.load_app()?)
            .with(OPTION_NAME, self.component.as_str())
            .with(OPTION_PATH, self.path.as_str())
            .with(OPTION_VALUE, self.value)
            .with(OPTION_GLOBAL, self.global)
            .with_optional(OPTION_ENV_NAME, self.env.clone())
            .with_optional(OPTION_INDEX, self.index);

        ParamSet::new(options)?.run()?;

        let scope = match (&self.env, self.global) {
            (Some(env), _) => format!("environment '{env}'"),
            (None, true) => format!("namespace '{}'", self.component),
            (None, false) => format!("component '{}'", self.component),
        };
        println!("{} Set {} for {}", "✓".green(), self.path, scope);
        Ok(())
    }
}
