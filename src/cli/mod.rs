//! CLI definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::DEFAULT_API_URL;

pub mod commands;

/// postmgn - keep Postman collections and environments in version control
///
/// Run without a command to check for names a teammate started tracking.
#[derive(Parser, Debug)]
#[command(name = "postmgn", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project directory holding postmgn.config
    #[arg(long, global = true, env = "POSTMGN_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Postman API base URL
    #[arg(long, global = true, env = "POSTMAN_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging (same as -vv)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Effective verbosity, with `--debug` counting as `-vv`.
    #[must_use]
    pub fn verbosity(&self) -> u8 {
        if self.debug {
            self.verbose.max(2)
        } else {
            self.verbose
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set up postmgn in the project directory
    Init,

    /// Push local documents to Postman (local wins)
    #[command(visible_alias = "im")]
    Import {
        /// Skip the overwrite confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Pull tracked resources from Postman (remote wins)
    #[command(visible_alias = "ex")]
    Export,

    /// Show tracked names and local files (offline)
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
