//! Collection scheduler
//!
//! Background task that drives the collector on a fixed interval until a
//! shutdown token fires. Ticks are serialized: the next interval starts
//! counting only after the previous sweep completes, so a slow provider
//! never stacks overlapping sweeps.

use chrono::Utc;
use metrics::{counter, histogram};
use tokio::time::{Duration, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::collector::WeatherCollector;

/// Interval-driven runner around [`WeatherCollector::collect_all`].
pub struct CollectionScheduler {
    collector: WeatherCollector,
    tick_interval: Duration,
}

impl CollectionScheduler {
    /// Create a scheduler using the configured collection interval.
    pub fn new(collector: WeatherCollector, interval_minutes: u64) -> Self {
        Self::with_interval(collector, Duration::from_secs(interval_minutes * 60))
    }

    /// Create a scheduler with an explicit tick interval.
    pub fn with_interval(collector: WeatherCollector, tick_interval: Duration) -> Self {
        Self {
            collector,
            tick_interval,
        }
    }

    /// Run the collection loop until the shutdown token fires.
    ///
    /// Cancellation stops scheduling new sweeps; a sweep already in
    /// flight finishes on its own.
    #[instrument(skip_all)]
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(
            interval_seconds = self.tick_interval.as_secs(),
            "Starting collection scheduler"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Collection scheduler shutdown requested");
                    break;
                }
                _ = sleep(self.tick_interval) => {
                    self.tick().await;
                }
            }
        }

        info!("Collection scheduler stopped");
    }

    /// Execute one scheduled sweep. Panics inside the sweep are contained
    /// at the tick boundary so the loop keeps running.
    #[instrument(skip_all)]
    pub async fn tick(&self) {
        let started_at = Utc::now();
        let tick_started = std::time::Instant::now();
        info!(%started_at, "Collection tick starting");

        let collector = self.collector.clone();
        match tokio::spawn(async move { collector.collect_all().await }).await {
            Ok(report) => {
                counter!("weatherhub_scheduler_ticks_total", "outcome" => "completed")
                    .increment(1);
                info!(
                    succeeded = report.succeeded(),
                    failed = report.failed(),
                    "Collection tick finished"
                );
            }
            Err(join_err) => {
                counter!("weatherhub_scheduler_ticks_total", "outcome" => "aborted")
                    .increment(1);
                error!(error = %join_err, "Collection tick aborted");
            }
        }

        let elapsed = tick_started.elapsed();
        histogram!("weatherhub_collection_tick_duration_ms")
            .record(elapsed.as_secs_f64() * 1_000.0);
    }
}
