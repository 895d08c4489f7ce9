use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use hakoniwa_infrastructure::storage::DEFAULT_CONFIG_FILE;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(name = "hakoniwa")]
#[command(about = "HAKONIWA - world state persistence and object resolution", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show the health summary for the resolved configuration
    Up {
        /// Config file (defaults apply when missing)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load a saved world state
    Load {
        /// Path to the state file
        path: PathBuf,
        /// Only validate integrity, schema and structure
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file
    Validate {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the command succeeded.
fn run(cli: Cli) -> Result<bool> {
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Validate { config } => commands::config::validate(&config, &mut out),
        },
        Commands::Up { config, json } => {
            let config = config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            commands::up::run(&config, json, &mut out)?;
            Ok(true)
        }
        Commands::Load { path, dry_run } => {
            if dry_run {
                commands::load::dry_run(&path, &mut out)
            } else {
                commands::load::load(&path, &mut out)
            }
        }
    }
}
