//! CLI entry point for showlog.
//!
//! # Responsibility
//! - Open the configured database and print representations as JSON.
//! - Keep output deterministic for quick local sanity checks.

use clap::{Parser, Subcommand};
use log::error;
use showlog_core::db::open_db;
use showlog_core::{init_from_config, ShowlogConfig, SqliteShowService};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// showlog - episode, guest and appearance records
#[derive(Parser)]
#[command(name = "showlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file; `[database] path` is required
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every episode with its appearances
    Episodes,
    /// List every guest with their appearances
    Guests,
    /// List every appearance
    Appearances,
    /// Show one episode
    Episode { id: i64 },
    /// Show one guest
    Guest { id: i64 },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => ShowlogConfig::load(path)?,
        None => ShowlogConfig::default(),
    };
    init_from_config(&config.logging)?;

    let conn = open_db(config.database.require_path()?)?;
    let service = SqliteShowService::open(&conn, config.links.route_table()?)?;

    let output = match cli.command {
        Commands::Episodes => serde_json::to_string_pretty(&service.episodes()?)?,
        Commands::Guests => serde_json::to_string_pretty(&service.guests()?)?,
        Commands::Appearances => serde_json::to_string_pretty(&service.appearances()?)?,
        Commands::Episode { id } => serde_json::to_string_pretty(&service.episode(id)?)?,
        Commands::Guest { id } => serde_json::to_string_pretty(&service.guest(id)?)?,
    };
    Ok(output)
}
