use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::debug;

use crate::{Commands, Config, NoteId, Result};

/// Main CLI application arguments and command structure
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Small notes kept in a single local storage slot"
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Directory holding the storage slot
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Keep notes in memory only; nothing is read or written on disk
    #[clap(long)]
    pub ephemeral: bool,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the sidenotes application
    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Loads the configuration file (explicit or default location) and
    /// applies command-line overrides.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match self.config.clone().or_else(Config::default_path) {
            Some(path) => Config::load(&path)?,
            None => Config::default(),
        };

        if let Some(dir) = &self.data_dir {
            debug!("Overriding data directory with {}", dir.display());
            config.data_dir = dir.clone();
        }

        Ok(config)
    }
}

/// One line typed into the interactive shell.
#[derive(Parser, Debug)]
#[clap(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[clap(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Select a note without printing it
    Select {
        /// ID of the note to select
        id: NoteId,
    },

    /// Clear the selection
    Clear,

    /// Leave the shell
    #[clap(alias = "exit")]
    Quit,

    #[clap(flatten)]
    Note(Commands),
}
