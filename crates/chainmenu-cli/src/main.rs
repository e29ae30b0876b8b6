use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chainmenu_ingest::{maybe_start_scheduler, AppConfig, IngestRunner};
use chainmenu_storage::db::PgMenuStore;
use chainmenu_web::AppState;

#[derive(Debug, Parser)]
#[command(name = "chainmenu-cli")]
#[command(about = "Chain menu reconciliation service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one reconciliation pass, for a single brand or all seeded brands.
    Ingest {
        #[arg(long)]
        brand: Option<String>,
    },
    /// Serve the admin API, plus the cron scheduler when enabled.
    Serve,
    /// Apply pending database migrations.
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let store = PgMenuStore::connect(&config.database_url)
        .await
        .context("connecting to database")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Ingest { brand } => {
            let runner = IngestRunner::from_config(config, Arc::new(store))?;
            match brand {
                Some(slug) => print_summary(&slug, &runner.run_brand(&slug).await?),
                None => {
                    for (slug, result) in runner.run_all().await? {
                        match result {
                            Ok(summary) => print_summary(&slug, &summary),
                            Err(err) => eprintln!("{slug}: ingest failed: {err}"),
                        }
                    }
                }
            }
        }
        Commands::Serve => {
            let admin_token = config.admin_token.clone();
            let port = config.web_port;
            let runner = Arc::new(IngestRunner::from_config(config, Arc::new(store))?);
            let _scheduler = maybe_start_scheduler(runner.clone()).await?;
            chainmenu_web::serve(AppState::new(admin_token, runner), port).await?;
        }
        Commands::Migrate => {
            store.run_migrations().await.context("running migrations")?;
            println!("migrations applied");
        }
    }

    Ok(())
}

fn print_summary(slug: &str, summary: &chainmenu_core::IngestSummary) {
    println!(
        "{slug}: status={} total={} created={} updated={} errors={}",
        summary.status().as_str(),
        summary.total,
        summary.created,
        summary.updated,
        summary.errors
    );
}
