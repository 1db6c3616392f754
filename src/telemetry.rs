//! Tracing setup and request correlation.
//!
//! One global subscriber carries logs for the API, the collection
//! scheduler and the insight calls alike. Every HTTP request runs inside
//! a task-local [`TraceContext`] whose identifier is echoed back in error
//! payloads, so a reported `trace_id` can be matched against the logs.

use std::any::type_name_of_val;
use std::sync::atomic::{AtomicBool, Ordering};

use log::LevelFilter;
use thiserror::Error;
use tokio::task_local;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::Layer,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

use crate::config::AppConfig;

/// Correlation metadata for one in-flight request.
#[derive(Debug, Clone)]
pub struct TraceContext {
    pub trace_id: String,
}

impl TraceContext {
    /// Build a context with a fresh `req-` prefixed identifier.
    pub fn for_request() -> Self {
        Self {
            trace_id: format!("req-{}", &uuid::Uuid::new_v4().to_string()[..13]),
        }
    }
}

task_local! {
    static ACTIVE_TRACE_CONTEXT: TraceContext;
}

/// Errors that can occur while initializing global telemetry.
#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("failed to install log tracer bridge: {0}")]
    LogTracer(#[from] log::SetLoggerError),
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

static TELEMETRY_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Filter applied when `RUST_LOG` is unset. The configured level governs
/// this crate; the database and HTTP internals stay at warn so steady-state
/// collection does not flood the output with driver chatter.
fn default_filter(config: &AppConfig) -> EnvFilter {
    EnvFilter::new(format!(
        "{level},sqlx=warn,hyper=warn,hyper_util=warn,reqwest=warn",
        level = config.log_level
    ))
}

/// Initialize global tracing/logging exactly once, wiring `log::` macros into the tracing pipeline.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryInitError> {
    if TELEMETRY_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Ok(());
    }

    // Install the bridge first so `log::` macros from dependencies route
    // through tracing.
    if let Err(err) = LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init()
    {
        // An already registered LogTracer (tests, another component) is
        // fine; anything else gets surfaced.
        let logger_type = type_name_of_val(log::logger());
        if !logger_type.contains("LogTracer") {
            eprintln!(
                "Warning: Failed to install log tracer bridge: {}. legacy `log::` macros will not emit structured tracing events.",
                err
            );
        }
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config));

    let fmt_layer = match config.log_format.as_str() {
        "pretty" => fmt::layer().pretty().boxed(),
        _ => fmt::layer().json().boxed(),
    };

    if let Err(err) = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
    {
        TELEMETRY_INITIALIZED.store(false, Ordering::SeqCst);
        eprintln!(
            "Warning: Failed to set global tracing subscriber: {}. Default subscriber remains in effect.",
            err
        );
    }

    Ok(())
}

/// Execute `future` within the provided trace context, making it available through task-local
/// storage for the duration of the request.
pub async fn with_trace_context<Fut, R>(context: TraceContext, future: Fut) -> R
where
    Fut: std::future::Future<Output = R>,
{
    ACTIVE_TRACE_CONTEXT.scope(context, future).await
}

/// Get the currently active trace ID, if one has been set for the running task.
pub fn current_trace_id() -> Option<String> {
    ACTIVE_TRACE_CONTEXT
        .try_with(|ctx| ctx.trace_id.clone())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trace_id_visible_inside_scope_only() {
        assert!(current_trace_id().is_none());

        let context = TraceContext {
            trace_id: "trace-123".to_string(),
        };

        let seen = with_trace_context(context, async { current_trace_id() }).await;
        assert_eq!(seen.as_deref(), Some("trace-123"));

        assert!(current_trace_id().is_none());
    }

    #[test]
    fn request_context_ids_are_prefixed_and_unique() {
        let a = TraceContext::for_request();
        let b = TraceContext::for_request();

        assert!(a.trace_id.starts_with("req-"));
        assert_eq!(a.trace_id.len(), "req-".len() + 13);
        assert_ne!(a.trace_id, b.trace_id);
    }
}
