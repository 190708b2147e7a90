use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// sitepipe - static-asset pipeline with dev server and live-reload
#[derive(Parser, Debug)]
#[command(name = "sitepipe")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'sitepipe' without a command to start the dev workflow.")]
pub struct Cli {
    /// Print events as NDJSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project root containing the source directory and sitepipe.toml
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Config file (defaults to <root>/sitepipe.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Build, serve and rebuild on change (default)
    Dev,

    /// One-shot production build
    Build,

    /// Run a single named task
    Run {
        /// Task name (see `sitepipe tasks`)
        task: String,
    },

    /// List task names
    Tasks,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Dev)
    }
}
