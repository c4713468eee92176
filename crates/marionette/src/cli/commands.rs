//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Marionette - play a scripted chat conversation through real identities
#[derive(Parser, Debug)]
#[command(name = "marionette")]
#[command(about = "Play a scripted chat conversation through real identities", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage every actor, then play the script under keyboard control
    Play {
        /// Directory holding script.json (or script.toml) and its assets
        dir: PathBuf,

        /// Log every platform call instead of sending anything
        #[arg(long)]
        dry_run: bool,

        /// Extra configuration file, applied over the standard ones
        #[arg(long, env = "MARIONETTE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the script as a plain transcript
    Print {
        /// Script directory
        dir: PathBuf,
    },

    /// Load and validate a script, then print its timing plan
    Check {
        /// Script directory
        dir: PathBuf,
    },
}
