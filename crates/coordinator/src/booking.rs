//! Booking orchestration.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use session_core::{CreateSessionRequest, Error, Result, Session};
use session_store::SessionStore;
use telemetry::metrics;
use tracing::{debug, info};

/// Creates sessions from booking requests.
#[derive(Clone)]
pub struct BookingOrchestrator {
    store: Arc<dyn SessionStore>,
}

impl BookingOrchestrator {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Validates the request and persists the new session.
    ///
    /// Direct requests must name a registered, active tutor. Any failure
    /// leaves no record behind.
    pub async fn create(&self, request: CreateSessionRequest) -> Result<Session> {
        let start = Instant::now();
        let now = Utc::now();

        if let Err(e) = request.check(now) {
            metrics().bookings_rejected.inc();
            debug!(error = %e, "Rejected booking request");
            return Err(e);
        }

        if let Some(ref tutor_id) = request.tutor_id {
            match self.store.get_tutor(tutor_id).await? {
                Some(tutor) if tutor.active => {}
                Some(_) => {
                    metrics().bookings_rejected.inc();
                    return Err(Error::invalid_request(format!(
                        "tutor {} is not accepting sessions",
                        tutor_id
                    )));
                }
                None => {
                    metrics().bookings_rejected.inc();
                    return Err(Error::invalid_request(format!(
                        "tutor {} is not registered",
                        tutor_id
                    )));
                }
            }
        }

        let session = self.store.create_session(request.to_session(now)).await?;

        metrics().sessions_created.inc();
        metrics()
            .booking_latency_ms
            .observe(start.elapsed().as_millis() as u64);
        info!(
            session_id = %session.id,
            student_id = %session.student_id,
            topic = %session.topic,
            status = %session.status,
            "Created session"
        );
        Ok(session)
    }
}
