//! Calendar API server.
//!
//! ```text
//! calendar-server --config config/calendar.yaml
//! calendar-server --config config/calendar.yaml --print-config
//! ```

mod bootstrap;
mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use calendar_api::{ApiState, AppServices, StaticTokenResolver, create_tables, router};
use clap::Parser;
use sea_orm::{ConnectOptions, Database};

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "calendar-server", version, about, long_about = None)]
struct Cli {
    /// YAML configuration file; `CALENDAR__*` environment variables override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override `server.bind_addr`
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let figment = AppConfig::figment(cli.config.as_deref())?;
    let mut config = AppConfig::from_figment(&figment)?;
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        return Ok(());
    }

    logging::init(&config.logging)?;
    run(config).await
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let mut opts = ConnectOptions::new(config.database.url.clone());
    opts.max_connections(config.database.max_connections);
    let db = Database::connect(opts)
        .await
        .context("failed to connect to database")?;
    if config.database.create_schema {
        create_tables(&db).await.context("failed to create schema")?;
    }

    tracing::info!(
        mode = ?config.access_policy.mode,
        strategy = ?config.access_policy.decision_strategy,
        "access policy loaded"
    );
    let services = Arc::new(AppServices::new(
        db,
        Arc::new(config.access_policy),
        config.calendar_api.service,
    ));
    bootstrap::provision_users(&services, &config.bootstrap).await?;

    let resolver = StaticTokenResolver::from_config(&config.calendar_api.authn);
    if resolver.is_empty() {
        tracing::warn!("no static tokens configured; all requests are anonymous");
    }

    let app = router(ApiState {
        services,
        resolver: Arc::new(resolver),
    });
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "calendar server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown requested");
}
