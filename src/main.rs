use std::{io, process};

use clap::Parser;
use log::{error, info};

use sidenotes::{App, Cli, ConsoleDialogs, FileStore, MemoryStore, NoteStore, Result};

pub fn initialize_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let dialogs = ConsoleDialogs::new(io::stdin().lock(), io::stdout());

    if cli.ephemeral {
        let store = NoteStore::with_key(MemoryStore::new(), config.storage_key.clone());
        App::new(store, config, dialogs, io::stdout()).run(cli.command)
    } else {
        let files = FileStore::open(&config.data_dir)?;
        let store = NoteStore::with_key(files, config.storage_key.clone());
        App::new(store, config, dialogs, io::stdout()).run(cli.command)
    }
}

fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    info!("Application starting up");

    if let Err(e) = run(cli) {
        // User mistakes were already shown as an alert
        if !e.is_user_facing() {
            error!("{}", e);
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }

    info!("Application shutting down");
}
