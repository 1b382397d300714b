//! vbsync CLI
//!
//! Exports a host's script modules into a directory tree, imports them back,
//! and keeps both sides in step while editing.

mod cli;
mod commands;
mod error;
mod interactive;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::CommandContext;
use error::Result;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug);

    if let Err(e) = run(cli.command, cli.config) {
        eprintln!("{}: {}", "error".red().bold(), e);
        if cli.debug {
            eprintln!("{:#?}", e);
        }
        std::process::exit(1);
    }
}

fn run(command: Commands, config: Option<std::path::PathBuf>) -> Result<()> {
    match command {
        Commands::Export {
            file,
            output,
            force,
            yes,
        } => commands::run_export(&CommandContext::new(file, output, config), force, yes),
        Commands::Import {
            file,
            input,
            force,
            yes,
        } => commands::run_import(&CommandContext::new(file, input, config), force, yes),
        Commands::Edit {
            file,
            output,
            force,
            yes,
            bidirectional,
        } => commands::run_edit(
            &CommandContext::new(file, output, config),
            force,
            yes,
            bidirectional,
        ),
    }
}
