//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// vbsync - edit a host's script modules as files, with live sync back
#[derive(Parser, Debug)]
#[command(name = "vbsync")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Example: vbsync edit --file drawing.json --force --bidirectional")]
pub struct Cli {
    /// Verbose logging with targets and source locations
    #[arg(long, global = true)]
    pub debug: bool,

    /// Settings file (default: vbsync.toml in the sync directory)
    #[arg(long, global = true, env = "VBSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Export every module once
    Export {
        /// Host project file
        #[arg(short, long)]
        file: PathBuf,

        /// Sync directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also rewrite document modules (ThisDocument)
        #[arg(long)]
        force: bool,

        /// Answer yes to every prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Import every module file once
    Import {
        /// Host project file
        #[arg(short, long)]
        file: PathBuf,

        /// Sync directory (default: current directory)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Also rewrite document modules (ThisDocument)
        #[arg(long)]
        force: bool,

        /// Answer yes to every prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export, then import every saved file until stopped
    ///
    /// Press Ctrl+C to stop the session.
    Edit {
        /// Host project file
        #[arg(short, long)]
        file: PathBuf,

        /// Sync directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also rewrite document modules (ThisDocument)
        #[arg(long)]
        force: bool,

        /// Answer yes to every prompt
        #[arg(short, long)]
        yes: bool,

        /// Export host changes back to the files periodically
        #[arg(long)]
        bidirectional: bool,
    },
}
