//! Service health tracking.
//!
//! Components flip their own flags as they observe failures; probe handlers
//! read the aggregate without touching the components.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Aggregate service state derived from the component flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    pub fn is_serving(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }
}

/// Liveness flag and failure note for one component.
#[derive(Debug)]
pub struct ComponentHealth {
    name: &'static str,
    healthy: AtomicBool,
    message: parking_lot::RwLock<Option<String>>,
}

impl ComponentHealth {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            healthy: AtomicBool::new(false),
            message: parking_lot::RwLock::new(None),
        }
    }

    pub fn set_healthy(&self) {
        self.healthy.store(true, Ordering::Relaxed);
        *self.message.write() = None;
    }

    pub fn set_unhealthy(&self, msg: impl Into<String>) {
        self.healthy.store(false, Ordering::Relaxed);
        *self.message.write() = Some(msg.into());
    }

    /// Records a fresh observation, attaching `msg` only on the unhealthy side.
    pub fn observe(&self, healthy: bool, msg: &str) {
        if healthy {
            self.set_healthy();
        } else {
            self.set_unhealthy(msg);
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    fn snapshot(&self) -> ComponentHealthReport {
        ComponentHealthReport {
            name: self.name.to_string(),
            healthy: self.is_healthy(),
            message: self.message.read().clone(),
        }
    }
}

/// Flat view of one component, for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealthReport {
    pub name: String,
    pub healthy: bool,
    pub message: Option<String>,
}

/// Point-in-time aggregate over every registered component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub components: Vec<ComponentHealthReport>,
}

/// The components the coordinator tracks.
///
/// The store gates readiness. The sweeper only degrades the report, since
/// expiry can lag without making live traffic unsafe.
pub struct HealthRegistry {
    pub store: ComponentHealth,
    pub sweeper: ComponentHealth,
}

impl HealthRegistry {
    pub const fn new() -> Self {
        Self {
            store: ComponentHealth::new("store"),
            sweeper: ComponentHealth::new("sweeper"),
        }
    }

    /// Generate a health report.
    pub fn report(&self) -> HealthReport {
        let components: Vec<ComponentHealthReport> = [&self.store, &self.sweeper]
            .into_iter()
            .map(ComponentHealth::snapshot)
            .collect();

        let healthy = components.iter().filter(|c| c.healthy).count();
        let status = if healthy == components.len() {
            HealthStatus::Healthy
        } else if healthy > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Unhealthy
        };

        HealthReport { status, components }
    }

    /// Whether the service should accept traffic.
    pub fn is_ready(&self) -> bool {
        self.store.is_healthy()
    }

    /// Whether the process is running at all.
    pub fn is_alive(&self) -> bool {
        true
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global health registry.
pub static HEALTH: LazyLock<HealthRegistry> = LazyLock::new(HealthRegistry::new);

/// Get the global health registry.
pub fn health() -> &'static HealthRegistry {
    &HEALTH
}
