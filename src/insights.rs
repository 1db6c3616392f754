//! # AI Insights
//!
//! Natural-language commentary over stored observations, generated by a
//! chat-completion model. The service assembles a compact weather context
//! from the latest observation plus a seven-day aggregate window, sends it
//! with a task-specific prompt and returns the model's reply verbatim.

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::models::weather_record::Model as WeatherRecordModel;
use crate::repositories::{StoreError, WeatherAnalytics, WeatherRecordRepository};

const CHAT_MODEL: &str = "gpt-4o-mini";
const CHAT_TEMPERATURE: f64 = 0.7;
const CHAT_MAX_TOKENS: u32 = 500;
const ANALYTICS_WINDOW_DAYS: i64 = 7;

/// The kind of commentary to generate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InsightKind {
    General,
    DailySummary,
    Clothing,
}

impl InsightKind {
    fn system_prompt(self) -> &'static str {
        match self {
            Self::General => {
                "You are a helpful weather analyst. Given current conditions and \
                 recent statistics for a city, provide a concise, informative \
                 insight about the weather. Mention notable patterns or anomalies."
            }
            Self::DailySummary => {
                "You are a weather reporter writing a short daily summary. Given \
                 current conditions and recent statistics for a city, write a \
                 friendly two-to-three sentence summary of today's weather."
            }
            Self::Clothing => {
                "You are a practical assistant. Given current conditions for a \
                 city, recommend appropriate clothing and accessories in two to \
                 three sentences."
            }
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::DailySummary => "daily_summary",
            Self::Clothing => "clothing",
        }
    }
}

/// A generated insight returned to API clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Insight {
    pub city_id: i64,
    pub city_name: String,
    pub kind: String,
    pub content: String,
    pub generated_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("insights are not configured; set an OpenAI API key")]
    NotConfigured,

    #[error("no weather observations stored for city {city_id}")]
    NoData { city_id: i64 },

    #[error("insight model returned HTTP {status}")]
    Upstream { status: u16, body: Option<String> },

    #[error("insight request failed: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    #[error("insight model reply was not usable: {details}")]
    MalformedReply { details: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Chat-completion backed insight generator.
#[derive(Clone)]
pub struct InsightsService {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl InsightsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.openai_api_base.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
        }
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate an insight of the requested kind for a city. A free-text
    /// question, when present, is appended to the weather context.
    pub async fn generate(
        &self,
        db: &DatabaseConnection,
        city_id: i64,
        kind: InsightKind,
        question: Option<&str>,
    ) -> Result<Insight, InsightError> {
        let api_key = self.api_key.as_ref().ok_or(InsightError::NotConfigured)?;

        let repo = WeatherRecordRepository::new(db);
        let latest = repo
            .latest_for_city(city_id)
            .await?
            .ok_or(InsightError::NoData { city_id })?;

        let window_start = (Utc::now() - Duration::days(ANALYTICS_WINDOW_DAYS)).fixed_offset();
        let analytics = repo.analytics(city_id, Some(window_start), None).await?;

        let mut context = build_context(&latest, analytics.as_ref());
        if let Some(question) = question.map(str::trim).filter(|q| !q.is_empty()) {
            context.push_str("\nUser question: ");
            context.push_str(question);
        }
        debug!(city_id, kind = kind.as_str(), "Requesting insight");

        let body = json!({
            "model": CHAT_MODEL,
            "temperature": CHAT_TEMPERATURE,
            "max_tokens": CHAT_MAX_TOKENS,
            "messages": [
                { "role": "system", "content": kind.system_prompt() },
                { "role": "user", "content": context },
            ],
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| InsightError::Network { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            return Err(InsightError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|err| InsightError::MalformedReply {
                    details: err.to_string(),
                })?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| InsightError::MalformedReply {
                details: "reply carried no message content".to_string(),
            })?;

        info!(city_id, kind = kind.as_str(), "Generated insight");

        Ok(Insight {
            city_id,
            city_name: latest.city_name,
            kind: kind.as_str().to_string(),
            content,
            generated_at: Utc::now(),
        })
    }
}

/// Render the weather context the model is prompted with.
fn build_context(latest: &WeatherRecordModel, analytics: Option<&WeatherAnalytics>) -> String {
    let mut lines = vec![
        format!("City: {} ({})", latest.city_name, latest.country),
        format!("Observed at: {}", latest.recorded_at),
        format!("Temperature: {:.1}°C", latest.temperature),
        format!("Feels like: {:.1}°C", latest.feels_like),
        format!("Humidity: {}%", latest.humidity),
        format!("Pressure: {} hPa", latest.pressure),
        format!("Wind speed: {:.1} m/s", latest.wind_speed),
        format!("Conditions: {}", latest.weather_description),
    ];

    if let Some(stats) = analytics {
        lines.push(format!(
            "Last {} days: {} observations",
            ANALYTICS_WINDOW_DAYS, stats.sample_count
        ));
        if let (Some(avg), Some(min), Some(max)) = (
            stats.avg_temperature,
            stats.min_temperature,
            stats.max_temperature,
        ) {
            lines.push(format!(
                "Temperature range: avg {:.1}°C, min {:.1}°C, max {:.1}°C",
                avg, min, max
            ));
        }
        if let Some(condition) = stats.most_frequent_condition.as_deref() {
            lines.push(format!("Most frequent condition: {}", condition));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> WeatherRecordModel {
        WeatherRecordModel {
            id: 1,
            city_id: 2_643_743,
            city_name: "London".to_string(),
            country: "GB".to_string(),
            latitude: 51.5085,
            longitude: -0.1257,
            temperature: 14.2,
            feels_like: 13.1,
            temp_min: 12.0,
            temp_max: 16.0,
            pressure: 1008,
            humidity: 72,
            wind_speed: 5.4,
            wind_direction: 230,
            cloudiness: 90,
            visibility: 10000,
            weather_main: "Clouds".to_string(),
            weather_description: "overcast clouds".to_string(),
            weather_icon: "04d".to_string(),
            recorded_at: Utc
                .with_ymd_and_hms(2026, 8, 20, 12, 0, 0)
                .unwrap()
                .fixed_offset(),
            created_at: Utc
                .with_ymd_and_hms(2026, 8, 20, 12, 0, 5)
                .unwrap()
                .fixed_offset(),
        }
    }

    #[test]
    fn context_includes_latest_and_window_stats() {
        let analytics = WeatherAnalytics {
            city_id: 2_643_743,
            period_start: None,
            period_end: None,
            sample_count: 42,
            avg_temperature: Some(13.5),
            min_temperature: Some(9.0),
            max_temperature: Some(18.5),
            avg_humidity: Some(70.0),
            avg_pressure: Some(1010.0),
            avg_wind_speed: Some(4.8),
            most_frequent_condition: Some("Clouds".to_string()),
        };

        let context = build_context(&sample_record(), Some(&analytics));
        assert!(context.contains("City: London (GB)"));
        assert!(context.contains("Temperature: 14.2°C"));
        assert!(context.contains("42 observations"));
        assert!(context.contains("Most frequent condition: Clouds"));
    }

    #[test]
    fn context_without_analytics_stays_minimal() {
        let context = build_context(&sample_record(), None);
        assert!(context.contains("Humidity: 72%"));
        assert!(!context.contains("observations"));
    }
}
