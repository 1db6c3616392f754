//! End-to-end collection pipeline tests: mock provider, real transform,
//! real repositories over an in-memory SQLite store.

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weatherhub::collector::{CollectError, WeatherCollector};
use weatherhub::config::AppConfig;
use weatherhub::models::{city, weather_record};
use weatherhub::provider::{OpenWeatherClient, ProviderError};

async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1);
    let db = Database::connect(options).await.expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

fn test_config(server: &MockServer, tracked: Vec<i64>) -> AppConfig {
    let mut config = AppConfig::default();
    config.weather_api_base = server.uri();
    config.weather_api_key = Some("test-key".to_string());
    config.collector.tracked_city_ids = tracked;
    config.collector.fetch_timeout_seconds = 2;
    config
}

fn collector(config: AppConfig, db: &DatabaseConnection) -> WeatherCollector {
    let config = Arc::new(config);
    let client = OpenWeatherClient::new(&config);
    WeatherCollector::new(config, Arc::new(db.clone()), client)
}

fn payload(city_id: i64, name: &str, temperature: f64) -> serde_json::Value {
    json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [
            { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }
        ],
        "base": "stations",
        "main": {
            "temp": temperature,
            "feels_like": temperature - 0.4,
            "temp_min": temperature - 2.0,
            "temp_max": temperature + 2.0,
            "pressure": 1012,
            "humidity": 64
        },
        "visibility": 10000,
        "wind": { "speed": 4.6, "deg": 240 },
        "clouds": { "all": 75 },
        "dt": 1_755_000_000i64,
        "sys": { "country": "GB", "sunrise": 1_754_970_000i64, "sunset": 1_755_020_000i64 },
        "timezone": 3600,
        "id": city_id,
        "name": name,
        "cod": 200
    })
}

fn mock_city(city_id: i64, name: &str, temperature: f64) -> Mock {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("id", city_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload(city_id, name, temperature)))
}

#[tokio::test]
async fn two_tracked_cities_end_to_end() {
    let server = MockServer::start().await;
    mock_city(2_643_743, "London", 14.2).mount(&server).await;
    mock_city(2_988_507, "Paris", 19.1).mount(&server).await;

    let db = test_db().await;
    let collector = collector(test_config(&server, vec![2_643_743, 2_988_507]), &db);

    let report = collector.collect_all().await;
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 0);

    let cities = city::Entity::find().count(&db).await.unwrap();
    let records = weather_record::Entity::find().count(&db).await.unwrap();
    assert_eq!(cities, 2);
    assert_eq!(records, 2);
}

#[tokio::test]
async fn one_failing_city_does_not_block_the_rest() {
    let server = MockServer::start().await;
    mock_city(5_128_581, "New York", 24.0).mount(&server).await;
    mock_city(1_850_144, "Tokyo", 29.5).mount(&server).await;
    mock_city(5_368_361, "San Jose", 22.3).mount(&server).await;
    mock_city(2_988_507, "Paris", 19.1).mount(&server).await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("id", "2643743"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let db = test_db().await;
    let tracked = vec![5_128_581, 2_643_743, 1_850_144, 5_368_361, 2_988_507];
    let collector = collector(test_config(&server, tracked), &db);

    let report = collector.collect_all().await;
    assert_eq!(report.succeeded(), 4);
    assert_eq!(report.failed(), 1);

    let failed = report
        .outcomes
        .iter()
        .find(|o| o.result.is_err())
        .expect("one failed outcome");
    assert_eq!(failed.city_id, 2_643_743);
    assert!(matches!(
        &failed.result,
        Err(CollectError::Fetch(ProviderError::Status { status: 500, .. }))
    ));

    let records = weather_record::Entity::find().count(&db).await.unwrap();
    assert_eq!(records, 4);
}

#[tokio::test]
async fn unauthorized_key_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "cod": 401, "message": "Invalid API key" })),
        )
        .mount(&server)
        .await;

    let db = test_db().await;
    let collector = collector(test_config(&server, vec![2_643_743]), &db);

    let report = collector.collect_all().await;
    assert_eq!(report.succeeded(), 0);
    assert_eq!(report.failed(), 1);
    assert!(matches!(
        &report.outcomes[0].result,
        Err(CollectError::Fetch(ProviderError::Unauthorized { .. }))
    ));

    let cities = city::Entity::find().count(&db).await.unwrap();
    let records = weather_record::Entity::find().count(&db).await.unwrap();
    assert_eq!(cities, 0);
    assert_eq!(records, 0);
}

#[tokio::test]
async fn malformed_payload_is_rejected_without_writes() {
    let server = MockServer::start().await;
    // Well-formed JSON but no "main" block, so normalization must fail.
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2_643_743i64,
            "name": "London",
            "dt": 1_755_000_000i64
        })))
        .mount(&server)
        .await;

    let db = test_db().await;
    let collector = collector(test_config(&server, vec![2_643_743]), &db);

    let report = collector.collect_all().await;
    assert_eq!(report.failed(), 1);
    assert!(matches!(
        &report.outcomes[0].result,
        Err(CollectError::Malformed(_))
    ));

    let records = weather_record::Entity::find().count(&db).await.unwrap();
    assert_eq!(records, 0);
}

#[tokio::test]
async fn sparse_payload_is_rejected_rather_than_stored_with_holes() {
    let server = MockServer::start().await;
    // Carries the identity fields and a temperature but none of the other
    // stored measurements; normalization must abort the city, not insert
    // a mostly-NULL observation.
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2_643_743i64,
            "name": "London",
            "main": { "temp": 14.2 },
            "dt": 1_755_000_000i64
        })))
        .mount(&server)
        .await;

    let db = test_db().await;
    let collector = collector(test_config(&server, vec![2_643_743]), &db);

    let report = collector.collect_all().await;
    assert_eq!(report.succeeded(), 0);
    assert!(matches!(
        &report.outcomes[0].result,
        Err(CollectError::Malformed(_))
    ));

    let cities = city::Entity::find().count(&db).await.unwrap();
    let records = weather_record::Entity::find().count(&db).await.unwrap();
    assert_eq!(cities, 0);
    assert_eq!(records, 0);
}

#[tokio::test]
async fn repeated_sweeps_keep_one_city_row() {
    let server = MockServer::start().await;
    mock_city(2_643_743, "London", 14.2).mount(&server).await;

    let db = test_db().await;
    let collector = collector(test_config(&server, vec![2_643_743]), &db);

    collector.collect_all().await;
    collector.collect_all().await;

    let cities = city::Entity::find().count(&db).await.unwrap();
    let records = weather_record::Entity::find().count(&db).await.unwrap();
    assert_eq!(cities, 1);
    assert_eq!(records, 2);
}
