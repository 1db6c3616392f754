//! Weather record repository
//!
//! Append-only storage of normalized observations plus the read queries
//! the API serves: latest per city, bounded history and window aggregates.
//! Aggregates are computed through the query builder so the same code runs
//! against Postgres in production and SQLite in tests.

use chrono::{DateTime, FixedOffset};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::weather_record::{ActiveModel, Column, Entity as WeatherRecord, Model};
use crate::repositories::StoreError;
use crate::transform::NewWeatherRecord;

/// Default and maximum row caps for history queries.
pub const DEFAULT_HISTORY_LIMIT: u64 = 100;
pub const MAX_HISTORY_LIMIT: u64 = 1000;

/// Parameters for a historical observation query.
#[derive(Debug, Clone)]
pub struct HistoricalQuery {
    pub city_id: i64,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    pub limit: Option<u64>,
}

/// Aggregate statistics over a city's observations in a time window.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeatherAnalytics {
    pub city_id: i64,
    /// Inclusive window start, when one was requested
    pub period_start: Option<DateTime<FixedOffset>>,
    /// Inclusive window end, when one was requested
    pub period_end: Option<DateTime<FixedOffset>>,
    pub sample_count: i64,
    pub avg_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_wind_speed: Option<f64>,
    pub most_frequent_condition: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct AggregateRow {
    sample_count: i64,
    avg_temperature: Option<f64>,
    min_temperature: Option<f64>,
    max_temperature: Option<f64>,
    avg_humidity: Option<f64>,
    avg_pressure: Option<f64>,
    avg_wind_speed: Option<f64>,
}

#[derive(Debug, FromQueryResult)]
struct ConditionCountRow {
    weather_main: String,
}

/// Repository for weather observation operations.
pub struct WeatherRecordRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WeatherRecordRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one normalized observation. Returns the stored row.
    pub async fn insert(&self, record: &NewWeatherRecord) -> Result<Model, StoreError> {
        let active = ActiveModel {
            city_id: Set(record.city_id),
            city_name: Set(record.city_name.clone()),
            country: Set(record.country.clone()),
            latitude: Set(record.latitude),
            longitude: Set(record.longitude),
            temperature: Set(record.temperature),
            feels_like: Set(record.feels_like),
            temp_min: Set(record.temp_min),
            temp_max: Set(record.temp_max),
            pressure: Set(record.pressure),
            humidity: Set(record.humidity),
            wind_speed: Set(record.wind_speed),
            wind_direction: Set(record.wind_direction),
            cloudiness: Set(record.cloudiness),
            visibility: Set(record.visibility),
            weather_main: Set(record.weather_main.clone()),
            weather_description: Set(record.weather_description.clone()),
            weather_icon: Set(record.weather_icon.clone()),
            recorded_at: Set(record.recorded_at),
            ..Default::default()
        };

        let model = WeatherRecord::insert(active)
            .exec_with_returning(self.db)
            .await?;
        Ok(model)
    }

    /// Most recent observation for a city, by observation time.
    pub async fn latest_for_city(&self, city_id: i64) -> Result<Option<Model>, StoreError> {
        let record = WeatherRecord::find()
            .filter(Column::CityId.eq(city_id))
            .order_by_desc(Column::RecordedAt)
            .order_by_desc(Column::Id)
            .one(self.db)
            .await?;
        Ok(record)
    }

    /// Most recent observation for every city that has at least one.
    pub async fn latest_per_city(&self) -> Result<Vec<Model>, StoreError> {
        // Small tracked-city sets make two queries cheaper than a window
        // function that SQLite and Postgres would spell differently.
        #[derive(Debug, FromQueryResult)]
        struct CityIdRow {
            city_id: i64,
        }

        let city_ids: Vec<CityIdRow> = WeatherRecord::find()
            .select_only()
            .column(Column::CityId)
            .distinct()
            .into_model()
            .all(self.db)
            .await?;

        let mut latest = Vec::with_capacity(city_ids.len());
        for row in city_ids {
            if let Some(record) = self.latest_for_city(row.city_id).await? {
                latest.push(record);
            }
        }
        latest.sort_by(|a, b| a.city_name.cmp(&b.city_name));
        Ok(latest)
    }

    /// Observations for a city within an optional time window, newest first.
    ///
    /// The row cap defaults to 100 and is clamped to 1000.
    pub async fn history(&self, query: &HistoricalQuery) -> Result<Vec<Model>, StoreError> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .min(MAX_HISTORY_LIMIT);

        let mut find = WeatherRecord::find().filter(Column::CityId.eq(query.city_id));

        if let Some(start) = query.start {
            find = find.filter(Column::RecordedAt.gte(start));
        }
        if let Some(end) = query.end {
            find = find.filter(Column::RecordedAt.lte(end));
        }

        let records = find
            .order_by_desc(Column::RecordedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;
        Ok(records)
    }

    /// Aggregate statistics for a city over an optional time window.
    ///
    /// Returns `None` when the window holds no observations.
    pub async fn analytics(
        &self,
        city_id: i64,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> Result<Option<WeatherAnalytics>, StoreError> {
        let mut base = WeatherRecord::find().filter(Column::CityId.eq(city_id));
        if let Some(start) = start {
            base = base.filter(Column::RecordedAt.gte(start));
        }
        if let Some(end) = end {
            base = base.filter(Column::RecordedAt.lte(end));
        }

        // Integer columns are promoted to float before AVG so both backends
        // return a double rather than a NUMERIC/blob value.
        let aggregate: Option<AggregateRow> = base
            .clone()
            .select_only()
            .column_as(Expr::col(Column::Id).count(), "sample_count")
            .column_as(
                Expr::expr(Func::avg(Expr::col(Column::Temperature))),
                "avg_temperature",
            )
            .column_as(Expr::col(Column::Temperature).min(), "min_temperature")
            .column_as(Expr::col(Column::Temperature).max(), "max_temperature")
            .column_as(
                Expr::expr(Func::avg(Expr::col(Column::Humidity).mul(1.0))),
                "avg_humidity",
            )
            .column_as(
                Expr::expr(Func::avg(Expr::col(Column::Pressure).mul(1.0))),
                "avg_pressure",
            )
            .column_as(
                Expr::expr(Func::avg(Expr::col(Column::WindSpeed))),
                "avg_wind_speed",
            )
            .into_model()
            .one(self.db)
            .await?;

        let aggregate = match aggregate {
            Some(row) if row.sample_count > 0 => row,
            _ => return Ok(None),
        };

        let top_condition: Option<ConditionCountRow> = base
            .filter(Column::WeatherMain.is_not_null())
            .select_only()
            .column(Column::WeatherMain)
            .group_by(Column::WeatherMain)
            .order_by_desc(Expr::col(Column::Id).count())
            .into_model()
            .one(self.db)
            .await?;

        Ok(Some(WeatherAnalytics {
            city_id,
            period_start: start,
            period_end: end,
            sample_count: aggregate.sample_count,
            avg_temperature: aggregate.avg_temperature,
            min_temperature: aggregate.min_temperature,
            max_temperature: aggregate.max_temperature,
            avg_humidity: aggregate.avg_humidity,
            avg_pressure: aggregate.avg_pressure,
            avg_wind_speed: aggregate.avg_wind_speed,
            most_frequent_condition: top_condition.map(|row| row.weather_main),
        }))
    }
}
