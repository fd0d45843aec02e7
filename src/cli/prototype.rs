//! `stencil prototype ...`
//!
//! `use` and `preview` take the prototype name first; everything after it is
//! handed to the prototype's own flag parser:
//!
//! ```bash
//! stencil prototype use single-port-deployment web --image=nginx --containerPort=80
//! stencil prototype use deployment web --help     # the prototype's flags
//! stencil prototype preview configmap --name=settings --value=hello
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use super::CliConfig;
use crate::actions::{
    OPTION_APP, OPTION_ARGUMENTS, OPTION_CONFIG, OPTION_FORMAT, OPTION_QUERY, Options, OutputFormat,
    PrototypeDescribe, PrototypeList, PrototypePreview, PrototypeSearch, PrototypeUse,
};

/// `stencil prototype`
#[derive(Args)]
pub struct PrototypeCommand {
    #[command(subcommand)]
    pub(super) command: PrototypeSubcommand,
}

#[derive(Subcommand)]
pub(super) enum PrototypeSubcommand {
    /// List every available prototype
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Find prototypes whose names contain a query
    Search {
        /// Substring to search for
        query: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show a prototype's parameters
    Describe {
        /// Prototype name or unique part of it
        query: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Render a prototype without creating a component
    Preview(PassthroughArgs),

    /// Create a component from a prototype
    Use(PassthroughArgs),
}

/// Raw arguments handed to the prototype's own flag parser.
#[derive(Args)]
pub(super) struct PassthroughArgs {
    /// <prototype> [args...] [--<param>=<value>...]
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0.., value_name = "ARGS")]
    pub(super) args: Vec<String>,
}

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Table => "table",
        OutputFormat::Json => "json",
        OutputFormat::Yaml => "yaml",
    }
}

impl PrototypeCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let options = Options::new()
            .with(OPTION_APP, config.load_app()?)
            .with(OPTION_CONFIG, config.load_global_config()?);
        let mut stdout = std::io::stdout().lock();

        match self.command {
            PrototypeSubcommand::List {
                format,
            } => PrototypeList::new(options.with(OPTION_FORMAT, format_name(format)))?.run(&mut stdout),
            PrototypeSubcommand::Search {
                query,
                format,
            } => PrototypeSearch::new(
                options.with(OPTION_QUERY, query).with(OPTION_FORMAT, format_name(format)),
            )?
            .run(&mut stdout),
            PrototypeSubcommand::Describe {
                query,
                format,
            } => PrototypeDescribe::new(
                options.with(OPTION_QUERY, query).with(OPTION_FORMAT, format_name(format)),
            )?
            .run(&mut stdout),
            PrototypeSubcommand::Preview(passthrough) => {
                PrototypePreview::new(options.with(OPTION_ARGUMENTS, passthrough.args))?.run(&mut stdout)
            }
            PrototypeSubcommand::Use(passthrough) => {
                let action = PrototypeUse::new(options.with(OPTION_ARGUMENTS, passthrough.args))?;
                if let Some(path) = action.run()? {
                    println!("{} Created component at {}", "✓".green(), path.display());
                }
                Ok(())
            }
        }
    }
}
