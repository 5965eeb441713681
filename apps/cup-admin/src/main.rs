//! # Cup Order Admin
//!
//! Command-line front end over the order service and the SQLite stock.
//!
//! ## Startup Sequence
//! ```text
//! 1. Parse arguments
//! 2. Load AdminConfig (defaults → TOML → CUP_* env)
//! 3. Install tracing subscriber
//! 4. Open database, run migrations, seed initial stock
//! 5. Run the command, print JSON to stdout
//! ```
//!
//! `init-config` stops after step 3 and writes the effective config.

mod cli;
mod commands;
mod config;
mod error;

use cup_db::{Database, DbConfig};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, Invocation};
use crate::config::AdminConfig;
use crate::error::AdminResult;

#[tokio::main]
async fn main() -> ExitCode {
    let invocation = match cli::parse(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{e}\n\n{}", cli::USAGE);
            return ExitCode::from(e.exit_code());
        }
    };

    if invocation.command == Command::Help {
        println!("{}", cli::USAGE);
        return ExitCode::SUCCESS;
    }

    match run(invocation).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(invocation: Invocation) -> AdminResult<()> {
    let config = AdminConfig::load(invocation.config_path.clone())?;
    init_tracing(&config.logging.filter);

    if invocation.command == Command::InitConfig {
        let path = config.save(invocation.config_path)?;
        let out = serde_json::json!({ "config_path": path });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let db_config = DbConfig::new(config.database_path())
        .max_connections(config.database.max_connections);
    if let Some(parent) = db_config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(db_config).await?;
    commands::seed_stock(&db, config.stock.initial_cups).await?;

    debug!(command = ?invocation.command, "Executing command");
    let outcome = commands::execute(invocation.command, &db).await;
    db.close().await;

    println!("{}", serde_json::to_string_pretty(&outcome?)?);
    Ok(())
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over the configured
/// filter.
fn init_tracing(configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
