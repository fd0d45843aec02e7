//! `stencil env list|add`

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use super::CliConfig;
use crate::constants::DEFAULT_ENVIRONMENT;
use crate::env;
use crate::utils::write_table;

/// `stencil env`
#[derive(Args)]
pub struct EnvCommand {
    #[command(subcommand)]
    command: EnvSubcommand,
}

#[derive(Subcommand)]
enum EnvSubcommand {
    /// List the app's environments
    List,

    /// Add an environment
    Add {
        /// Environment name
        name: String,

        /// Namespace the environment deploys into
        #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
        namespace: String,
    },
}

impl EnvCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let mut app = config.load_app()?;

        match self.command {
            EnvSubcommand::List => {
                let rows: Vec<[&str; 2]> = app
                    .environments()
                    .iter()
                    .map(|(name, spec)| [name.as_str(), spec.namespace.as_str()])
                    .collect();
                write_table(&mut std::io::stdout().lock(), ["NAME", "NAMESPACE"], &rows)
            }
            EnvSubcommand::Add {
                name,
                namespace,
            } => {
                env::add(&mut app, &name, &namespace)?;
                println!("{} Added environment '{}' (namespace '{}')", "✓".green(), name, namespace);
                Ok(())
            }
        }
    }
}
