//! Structured logging setup.
//!
//! Human-readable single-line output by default. Set `LOG_JSON=1` for one
//! JSON object per line, and `RUST_LOG` to adjust filtering, e.g.
//! `info,coordinator=debug`.

use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log output options, resolved once at startup.
///
/// `RUST_LOG` always wins over the configured filter so operators can turn
/// on debug output without touching configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Filter directives in `RUST_LOG` syntax
    pub filter: String,
    /// One JSON object per line, for log shippers
    pub json: bool,
    /// Record span open and close events
    pub span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Reads `RUST_LOG`, `LOG_JSON` and `LOG_SPAN_EVENTS` from the environment.
    pub fn from_env() -> Self {
        let truthy = |name: &str| {
            std::env::var(name)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };

        Self {
            filter: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json: truthy("LOG_JSON"),
            span_events: truthy("LOG_SPAN_EVENTS"),
        }
    }
}

/// Installs the global subscriber.
pub fn init_tracing(config: TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(span_events)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_span_events(span_events).with_target(true))
            .init();
    }

    tracing::info!(filter = %config.filter, json = config.json, "Logging initialized");
}

/// Installs the global subscriber from environment variables alone.
pub fn init_tracing_from_env() {
    init_tracing(TracingConfig::from_env());
}
