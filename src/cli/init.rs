//! Create a new app.
//!
//! ```bash
//! stencil init guestbook              # creates ./guestbook
//! stencil init guestbook --dir .      # initializes the current directory
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::actions::init_app;
use crate::utils::ensure_dir;

/// `stencil init`
#[derive(Args)]
pub struct InitCommand {
    /// App name
    name: String,

    /// Directory to create the app in (default: ./<name>)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl InitCommand {
    pub fn execute(self) -> Result<()> {
        let dir = self.dir.unwrap_or_else(|| PathBuf::from(&self.name));
        ensure_dir(&dir)?;

        let app = init_app(&dir, &self.name)?;

        println!("{} Initialized app '{}' at {}", "✓".green(), app.name(), dir.display());
        println!("\n{}", "Next steps:".cyan());
        println!("  List prototypes with {}", "stencil prototype list".bright_white());
        println!(
            "  Create a component with {}",
            "stencil prototype use <prototype> <component> [flags]".bright_white()
        );
        Ok(())
    }
}
