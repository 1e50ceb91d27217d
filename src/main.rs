//! TutorMatch session coordinator
//!
//! Coordinates tutoring sessions between students and tutors:
//! - Subject-tag matching against the tutor directory
//! - At-most-one-owner claim coordination over a versioned store
//! - Session lifecycle enforcement from booking to completion
//! - Background expiry sweeping for stalled sessions

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use api::{router, AppState};
use session_core::{MatchGroup, TagIndex, TutorProfile};
use session_store::{MemoryStore, MemoryStoreConfig, SessionStore};
use telemetry::{health, init_tracing_from_env};
use worker::{WorkerConfig, WorkerScheduler};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default)]
    store: MemoryStoreConfig,

    #[serde(default)]
    worker: WorkerConfig,

    /// Match-group catalog; the built-in catalog applies when empty
    #[serde(default)]
    subjects: Vec<MatchGroup>,

    /// Tutor directory seeded at startup
    #[serde(default)]
    tutors: Vec<TutorProfile>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: MemoryStoreConfig::default(),
            worker: WorkerConfig::default(),
            subjects: Vec::new(),
            tutors: Vec::new(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting TutorMatch coordinator v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    // Build the subject tag index
    let index = if config.subjects.is_empty() {
        Arc::new(TagIndex::builtin())
    } else {
        Arc::new(TagIndex::new(&config.subjects))
    };
    info!(
        groups = index.group_count(),
        tags = index.tag_count(),
        "Built subject tag index"
    );

    // In-memory store; sessions do not survive a restart
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new(config.store.clone()));
    health().store.set_healthy();

    // Seed the tutor directory
    for tutor in &config.tutors {
        tutor
            .check()
            .with_context(|| format!("Invalid tutor profile {}", tutor.id))?;
        store
            .upsert_tutor(tutor.clone())
            .await
            .with_context(|| format!("Failed to register tutor {}", tutor.id))?;
    }
    if !config.tutors.is_empty() {
        info!(tutors = config.tutors.len(), "Seeded tutor directory");
    }

    // Start background workers
    let scheduler = Arc::new(WorkerScheduler::new(config.worker.clone(), store.clone()));
    let _worker_handles = scheduler.start();

    // Create application state and router
    let state = AppState::new(store, index);
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("TUTORMATCH")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested worker config from environment
    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(secs) = std::env::var("TUTORMATCH_SWEEP_INTERVAL_SECS") {
        config.worker.sweep_interval_secs = secs
            .parse()
            .context("Invalid TUTORMATCH_SWEEP_INTERVAL_SECS")?;
    }
    if let Ok(minutes) = std::env::var("TUTORMATCH_SEARCH_TIMEOUT_MINUTES") {
        config.worker.search_timeout_minutes = minutes
            .parse()
            .context("Invalid TUTORMATCH_SEARCH_TIMEOUT_MINUTES")?;
    }
    if let Ok(minutes) = std::env::var("TUTORMATCH_APPROVAL_TIMEOUT_MINUTES") {
        config.worker.approval_timeout_minutes = minutes
            .parse()
            .context("Invalid TUTORMATCH_APPROVAL_TIMEOUT_MINUTES")?;
    }
    if let Ok(minutes) = std::env::var("TUTORMATCH_PAYMENT_TIMEOUT_MINUTES") {
        config.worker.payment_timeout_minutes = minutes
            .parse()
            .context("Invalid TUTORMATCH_PAYMENT_TIMEOUT_MINUTES")?;
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
