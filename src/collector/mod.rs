//! # Weather Collector
//!
//! The collection pipeline: fetch current conditions for every tracked
//! city, normalize the payloads and persist them. Each city is handled
//! independently so one failing city never blocks the rest of the sweep.

pub mod scheduler;

use std::sync::Arc;

use metrics::counter;
use sea_orm::DatabaseConnection;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::provider::{OpenWeatherClient, ProviderError};
use crate::repositories::{CityRepository, StoreError, WeatherRecordRepository};
use crate::transform::{self, MalformedPayloadError};

pub use scheduler::CollectionScheduler;

/// A single city's collection failure.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] ProviderError),

    #[error("payload could not be normalized: {0}")]
    Malformed(#[from] MalformedPayloadError),

    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),

    #[error("collection task aborted: {0}")]
    Aborted(String),
}

/// Outcome of one city within a sweep.
#[derive(Debug)]
pub struct CityOutcome {
    pub city_id: i64,
    pub result: Result<i32, CollectError>,
}

/// Summary of a full collection sweep.
#[derive(Debug, Default)]
pub struct CollectionReport {
    pub outcomes: Vec<CityOutcome>,
}

impl CollectionReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Fetch-transform-store pipeline over the tracked city set.
#[derive(Clone)]
pub struct WeatherCollector {
    config: Arc<AppConfig>,
    db: Arc<DatabaseConnection>,
    provider: OpenWeatherClient,
}

impl WeatherCollector {
    pub fn new(
        config: Arc<AppConfig>,
        db: Arc<DatabaseConnection>,
        provider: OpenWeatherClient,
    ) -> Self {
        Self {
            config,
            db,
            provider,
        }
    }

    /// Collect one city: fetch, normalize, upsert the catalog row and
    /// append the observation. Returns the stored record id.
    pub async fn collect_city(&self, city_id: i64) -> Result<i32, CollectError> {
        let payload = self.provider.current_by_city_id(city_id).await?;
        let (record, city) = transform::transform(&payload)?;

        CityRepository::new(&self.db).upsert(&city).await?;
        let stored = WeatherRecordRepository::new(&self.db)
            .insert(&record)
            .await?;

        info!(
            city_id,
            city_name = %record.city_name,
            temperature = record.temperature,
            record_id = stored.id,
            "Stored weather observation"
        );

        Ok(stored.id)
    }

    /// Collect every tracked city concurrently and report per-city outcomes.
    pub async fn collect_all(&self) -> CollectionReport {
        let city_ids = self.config.collector.tracked_city_ids.clone();
        info!(cities = city_ids.len(), "Starting collection sweep");

        let handles: Vec<(i64, JoinHandle<Result<i32, CollectError>>)> = city_ids
            .into_iter()
            .map(|city_id| {
                let collector = self.clone();
                let handle = tokio::spawn(async move { collector.collect_city(city_id).await });
                (city_id, handle)
            })
            .collect();

        let mut report = CollectionReport::default();
        for (city_id, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(CollectError::Aborted(join_err.to_string())),
            };

            match &result {
                Ok(record_id) => {
                    counter!("weatherhub_collections_total", "outcome" => "success")
                        .increment(1);
                    info!(city_id, record_id, "City collection succeeded");
                }
                Err(err) => {
                    counter!("weatherhub_collections_total", "outcome" => "failure")
                        .increment(1);
                    warn!(city_id, error = %err, "City collection failed");
                }
            }

            report.outcomes.push(CityOutcome { city_id, result });
        }

        if report.failed() > 0 {
            error!(
                succeeded = report.succeeded(),
                failed = report.failed(),
                "Collection sweep finished with failures"
            );
        } else {
            info!(succeeded = report.succeeded(), "Collection sweep finished");
        }

        report
    }
}
