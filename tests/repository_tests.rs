//! Repository tests against an in-memory SQLite store.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use weatherhub::models::city;
use weatherhub::repositories::{CityRepository, HistoricalQuery, WeatherRecordRepository};
use weatherhub::transform::{NewCity, NewWeatherRecord};

async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1);
    let db = Database::connect(options).await.expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

fn london() -> NewCity {
    NewCity {
        city_id: 2_643_743,
        name: "London".to_string(),
        country: "GB".to_string(),
        latitude: 51.5085,
        longitude: -0.1257,
        timezone: 3600,
    }
}

fn record_at(recorded_at: DateTime<FixedOffset>, temperature: f64) -> NewWeatherRecord {
    NewWeatherRecord {
        city_id: 2_643_743,
        city_name: "London".to_string(),
        country: "GB".to_string(),
        latitude: 51.5085,
        longitude: -0.1257,
        temperature,
        feels_like: temperature - 0.5,
        temp_min: temperature - 2.0,
        temp_max: temperature + 2.0,
        pressure: 1010,
        humidity: 70,
        wind_speed: 4.0,
        wind_direction: 200,
        cloudiness: 75,
        visibility: 10000,
        weather_main: "Clouds".to_string(),
        weather_description: "broken clouds".to_string(),
        weather_icon: "04d".to_string(),
        recorded_at,
    }
}

#[tokio::test]
async fn upsert_is_idempotent_and_second_values_win() {
    let db = test_db().await;
    let repo = CityRepository::new(&db);

    let first = repo.upsert(&london()).await.expect("first upsert");

    let mut updated = london();
    updated.name = "London Updated".to_string();
    updated.timezone = 0;
    let second = repo.upsert(&updated).await.expect("second upsert");

    let total = city::Entity::find().count(&db).await.expect("count");
    assert_eq!(total, 1);
    assert_eq!(first.city_id, second.city_id);
    assert_eq!(second.name, "London Updated");
    assert_eq!(second.timezone, 0);
}

#[tokio::test]
async fn record_round_trips_through_its_window() {
    let db = test_db().await;
    let repo = WeatherRecordRepository::new(&db);

    let t = Utc
        .with_ymd_and_hms(2026, 8, 15, 12, 0, 0)
        .unwrap()
        .fixed_offset();
    repo.insert(&record_at(t, 13.0)).await.expect("insert");

    let hit = repo
        .history(&HistoricalQuery {
            city_id: 2_643_743,
            start: Some(t - Duration::minutes(1)),
            end: Some(t + Duration::minutes(1)),
            limit: None,
        })
        .await
        .expect("window query");
    assert_eq!(hit.len(), 1);
    assert_eq!(hit[0].recorded_at.timestamp(), t.timestamp());

    let miss = repo
        .history(&HistoricalQuery {
            city_id: 2_643_743,
            start: Some(t + Duration::minutes(10)),
            end: Some(t + Duration::minutes(20)),
            limit: None,
        })
        .await
        .expect("disjoint window query");
    assert!(miss.is_empty());
}

#[tokio::test]
async fn history_is_newest_first_and_capped() {
    let db = test_db().await;
    let repo = WeatherRecordRepository::new(&db);

    let base = Utc
        .with_ymd_and_hms(2026, 8, 15, 0, 0, 0)
        .unwrap()
        .fixed_offset();
    for hour in 0..5 {
        repo.insert(&record_at(base + Duration::hours(hour), 10.0 + hour as f64))
            .await
            .expect("insert");
    }

    let rows = repo
        .history(&HistoricalQuery {
            city_id: 2_643_743,
            start: None,
            end: None,
            limit: Some(3),
        })
        .await
        .expect("history");

    assert_eq!(rows.len(), 3);
    assert!(rows[0].recorded_at > rows[1].recorded_at);
    assert!(rows[1].recorded_at > rows[2].recorded_at);
    assert_eq!(rows[0].temperature, 14.0);
}

#[tokio::test]
async fn latest_picks_most_recent_observation() {
    let db = test_db().await;
    let repo = WeatherRecordRepository::new(&db);

    let base = Utc
        .with_ymd_and_hms(2026, 8, 15, 0, 0, 0)
        .unwrap()
        .fixed_offset();
    repo.insert(&record_at(base, 10.0)).await.expect("insert");
    repo.insert(&record_at(base + Duration::hours(2), 12.0))
        .await
        .expect("insert");
    repo.insert(&record_at(base + Duration::hours(1), 11.0))
        .await
        .expect("insert");

    let latest = repo
        .latest_for_city(2_643_743)
        .await
        .expect("latest query")
        .expect("row present");
    assert_eq!(latest.temperature, 12.0);
}

#[tokio::test]
async fn analytics_aggregates_and_ranks_conditions() {
    let db = test_db().await;
    let repo = WeatherRecordRepository::new(&db);

    let base = Utc
        .with_ymd_and_hms(2026, 8, 15, 0, 0, 0)
        .unwrap()
        .fixed_offset();

    let mut rainy = record_at(base, 9.0);
    rainy.weather_main = "Rain".to_string();
    repo.insert(&rainy).await.expect("insert");

    repo.insert(&record_at(base + Duration::hours(1), 11.0))
        .await
        .expect("insert");
    repo.insert(&record_at(base + Duration::hours(2), 13.0))
        .await
        .expect("insert");

    let stats = repo
        .analytics(2_643_743, None, None)
        .await
        .expect("analytics query")
        .expect("window not empty");

    assert_eq!(stats.sample_count, 3);
    assert_eq!(stats.min_temperature, Some(9.0));
    assert_eq!(stats.max_temperature, Some(13.0));
    assert_eq!(stats.avg_temperature, Some(11.0));
    assert_eq!(stats.avg_humidity, Some(70.0));
    assert_eq!(stats.most_frequent_condition.as_deref(), Some("Clouds"));
}

#[tokio::test]
async fn analytics_of_empty_window_is_none() {
    let db = test_db().await;
    let repo = WeatherRecordRepository::new(&db);

    let stats = repo
        .analytics(2_643_743, None, None)
        .await
        .expect("analytics query");
    assert!(stats.is_none());
}

#[tokio::test]
async fn search_matches_substring_case_insensitively() {
    let db = test_db().await;
    let repo = CityRepository::new(&db);

    repo.upsert(&london()).await.expect("upsert");
    let mut paris = london();
    paris.city_id = 2_988_507;
    paris.name = "Paris".to_string();
    paris.country = "FR".to_string();
    repo.upsert(&paris).await.expect("upsert");

    let hits = repo.search("LON").await.expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "London");

    let none = repo.search("berlin").await.expect("search");
    assert!(none.is_empty());
}
