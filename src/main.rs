//! # WeatherHub Main Entry Point
//!
//! Loads configuration, runs migrations, starts the collection scheduler
//! and serves the HTTP API until interrupted.

use std::sync::Arc;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use weatherhub::collector::{CollectionScheduler, WeatherCollector};
use weatherhub::config::ConfigLoader;
use weatherhub::provider::OpenWeatherClient;
use weatherhub::{db, server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .load()
        .context("failed to load configuration")?;
    config.validate().context("configuration is invalid")?;

    telemetry::init_tracing(&config).context("failed to initialize telemetry")?;

    info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted) = config.redacted_json() {
        info!(config = %redacted, "Effective configuration");
    }

    let config = Arc::new(config);
    let pool = db::init_pool(&config)
        .await
        .context("failed to connect to database")?;

    Migrator::up(&pool, None)
        .await
        .context("failed to run database migrations")?;

    let shutdown = CancellationToken::new();

    let collector = WeatherCollector::new(
        config.clone(),
        Arc::new(pool.clone()),
        OpenWeatherClient::new(&config),
    );

    // One immediate sweep at startup so the store is never empty for a
    // full interval after boot.
    {
        let collector = collector.clone();
        tokio::spawn(async move {
            let report = collector.collect_all().await;
            info!(
                succeeded = report.succeeded(),
                failed = report.failed(),
                "Initial collection sweep finished"
            );
        });
    }

    let scheduler =
        CollectionScheduler::new(collector, config.collector.interval_minutes);
    let scheduler_shutdown = shutdown.clone();
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(scheduler_shutdown).await;
    });

    let signal_shutdown = shutdown.clone();
    let shutdown_future = async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
        signal_shutdown.cancel();
    };

    server::run_server(config, pool, shutdown_future).await?;

    shutdown.cancel();
    if let Err(err) = scheduler_handle.await {
        error!(error = %err, "Collection scheduler task failed");
    }

    info!("Shutdown complete");
    Ok(())
}
