//! Worker scheduler for background tasks.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use session_store::SessionStore;
use telemetry::{health, metrics};
use tokio::time::interval;
use tracing::{error, info};

use crate::sweeper::{ExpirySweeper, SweepTimeouts};

/// Worker scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Seconds between sweep passes
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Seconds between metrics snapshot logs
    #[serde(default = "default_metrics_log_interval_secs")]
    pub metrics_log_interval_secs: u64,
    /// Minutes an open search may stay unclaimed
    #[serde(default = "default_search_timeout_minutes")]
    pub search_timeout_minutes: i64,
    /// Minutes a direct request may wait on its tutor
    #[serde(default = "default_approval_timeout_minutes")]
    pub approval_timeout_minutes: i64,
    /// Minutes a claimed session may sit unpaid
    #[serde(default = "default_payment_timeout_minutes")]
    pub payment_timeout_minutes: i64,
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_metrics_log_interval_secs() -> u64 {
    60
}

fn default_search_timeout_minutes() -> i64 {
    30
}

fn default_approval_timeout_minutes() -> i64 {
    1440 // 24 hours
}

fn default_payment_timeout_minutes() -> i64 {
    15
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            metrics_log_interval_secs: default_metrics_log_interval_secs(),
            search_timeout_minutes: default_search_timeout_minutes(),
            approval_timeout_minutes: default_approval_timeout_minutes(),
            payment_timeout_minutes: default_payment_timeout_minutes(),
        }
    }
}

impl WorkerConfig {
    /// Sweep cutoffs as durations.
    pub fn timeouts(&self) -> SweepTimeouts {
        SweepTimeouts {
            search: chrono::Duration::minutes(self.search_timeout_minutes),
            approval: chrono::Duration::minutes(self.approval_timeout_minutes),
            payment: chrono::Duration::minutes(self.payment_timeout_minutes),
        }
    }
}

/// Background worker scheduler.
pub struct WorkerScheduler {
    config: WorkerConfig,
    store: Arc<dyn SessionStore>,
}

impl WorkerScheduler {
    pub fn new(config: WorkerConfig, store: Arc<dyn SessionStore>) -> Self {
        Self { config, store }
    }

    /// Starts all background workers.
    pub fn start(self: Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        let mut handles = Vec::new();

        // Expiry sweeper
        let scheduler = self.clone();
        handles.push(tokio::spawn(async move {
            scheduler.run_sweeper().await;
        }));

        // Metrics snapshot logger
        let scheduler = self.clone();
        handles.push(tokio::spawn(async move {
            scheduler.run_metrics_log().await;
        }));

        info!("Background workers started");
        handles
    }

    async fn run_sweeper(&self) {
        let sweeper = ExpirySweeper::new(self.store.clone(), self.config.timeouts());
        let mut ticker = interval(Duration::from_secs(self.config.sweep_interval_secs));

        health().sweeper.set_healthy();
        loop {
            ticker.tick().await;

            match sweeper.run().await {
                Ok(_) => health().sweeper.set_healthy(),
                Err(e) => {
                    health().sweeper.set_unhealthy(format!("sweep failed: {}", e));
                    error!("Sweeper error: {}", e);
                }
            }
        }
    }

    async fn run_metrics_log(&self) {
        let mut ticker = interval(Duration::from_secs(self.config.metrics_log_interval_secs));

        loop {
            ticker.tick().await;

            let snapshot = metrics().snapshot();
            info!(
                sessions_created = snapshot.sessions_created,
                bookings_rejected = snapshot.bookings_rejected,
                claims_won = snapshot.claims_won,
                claims_conflicted = snapshot.claims_conflicted,
                sessions_completed = snapshot.sessions_completed,
                sessions_cancelled = snapshot.sessions_cancelled,
                sweeper_cancellations = snapshot.sweeper_cancellations,
                open_sessions = snapshot.open_sessions,
                live_sessions = snapshot.live_sessions,
                claim_latency_mean_ms = snapshot.claim_latency_mean_ms,
                "Metrics snapshot"
            );
        }
    }
}
