use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use steamrank_core::RunMode;
use tracing_subscriber::EnvFilter;

mod enrich;
mod failure_log;
mod pipeline;
mod stages;

#[derive(Debug, Parser)]
#[command(name = "steamrank")]
#[command(about = "Enrich the game catalog with Steam store metadata")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Bulk pass over the tab-separated game list
    Enrich {
        /// Input list (defaults to STEAMRANK_GAMES_PATH)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Retry pass over the failure log; also rewrites stored names
    Retry {
        /// Input list (defaults to STEAMRANK_FAILED_PATH)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Database operations
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = steamrank_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Enrich { input } => {
            let summary = enrich::run_enrich(&config, RunMode::Bulk, input.as_deref()).await?;
            println!(
                "enriched {} of {} games ({} failures logged to {})",
                summary.updated,
                summary.processed,
                summary.failures_logged,
                config.failed_path.display()
            );
        }
        Commands::Retry { input } => {
            let summary = enrich::run_enrich(&config, RunMode::Retry, input.as_deref()).await?;
            println!(
                "retried {} games, {} updated",
                summary.processed, summary.updated
            );
        }
        Commands::Db { command } => run_db_command(&config, command).await?,
    }

    Ok(())
}

async fn run_db_command(
    config: &steamrank_core::AppConfig,
    command: DbCommands,
) -> anyhow::Result<()> {
    let mut conn = steamrank_db::connect(&config.db)
        .await
        .context("failed to connect to catalog database")?;

    match command {
        DbCommands::Ping => {
            steamrank_db::ping(&mut conn).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = steamrank_db::run_migrations(&mut conn).await?;
            tracing::info!(applied, "migrations complete");
            println!("applied {applied} migration(s)");
        }
    }

    sqlx::Connection::close(conn).await?;
    Ok(())
}
