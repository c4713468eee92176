//! Marionette CLI binary.
//!
//! This binary provides command-line access to marionette:
//! - Play a script live, or as a dry run
//! - Print a script's transcript
//! - Check a script and its timing plan

use clap::Parser;
use marionette::{ObservabilityConfig, PlaybackConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, check_script, play, print_transcript};

    // Credentials and MARIONETTE_* overrides may live in .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let explicit = match &cli.command {
        Commands::Play { config, .. } => config.as_deref(),
        _ => None,
    };
    let config = PlaybackConfig::load(explicit)?;

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level().clone()
    };
    init_observability(
        &ObservabilityConfig::new(log_level).with_json_logs(*config.log_json()),
    )?;

    match cli.command {
        Commands::Play { dir, dry_run, .. } => {
            play(&dir, dry_run, &config).await?;
        }

        Commands::Print { dir } => {
            print_transcript(&dir)?;
        }

        Commands::Check { dir } => {
            if check_script(&dir)? > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
