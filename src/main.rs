//! tasklist
//!
//! Personal task tracker backed by a local SQLite file, usable from the
//! command line or as a JSON HTTP API.

use anyhow::Result;
use clap::Parser;
use std::io::{IsTerminal, Write};
use tasklist::cli::{Cli, Command, ServeArgs, tasks};
use tasklist::config::Config;
use tasklist::db::Database;
use tasklist::http;
use tasklist::logging::{self, LogTarget};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let mut config = Config::resolve(cli.config.as_deref())?;

    // Override paths from CLI arguments
    if let Some(db_path) = &cli.database {
        config.database.path = db_path.clone();
    }
    debug!(db_path = %config.database.path.display(), "Resolved configuration");

    let db = Database::open(&config.database.path)?;

    let stdout = std::io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();

    match cli.command {
        Command::ShowList => tasks::run_show_list(&db, &mut out)?,
        Command::AddItem {
            task_name,
            description,
        } => tasks::run_add_item(&db, &task_name, &description, color, &mut out)?,
        Command::UpdateItem {
            task_id,
            new_status,
        } => tasks::run_update_item(&db, task_id, &new_status, color, &mut out)?,
        Command::RemoveItem { task_id } => {
            tasks::run_remove_item(&db, task_id, color, &mut out)?
        }
        Command::Serve(args) => {
            drop(out);
            run_server(db, config, args).await?;
            return Ok(());
        }
    }

    out.flush()?;
    Ok(())
}

/// Run the HTTP API until Ctrl-C.
async fn run_server(db: Database, mut config: Config, args: ServeArgs) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!(
        origins = ?config.server.allowed_origins,
        "Starting task API"
    );

    http::serve(db, &config.server, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown requested");
    })
    .await
}
