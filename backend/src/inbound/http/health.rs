//! Liveness and readiness probes.
//!
//! The server starts in [`Lifecycle::Starting`] and only reports ready once
//! migrations have run and interrupted account deletions have been swept.
//! Shutdown moves it to [`Lifecycle::Draining`] so both probes fail early.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Process lifecycle as reported to probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Starting,
    Ready,
    Draining,
}

impl Lifecycle {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Starting => 0,
            Self::Ready => 1,
            Self::Draining => 2,
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Ready,
            _ => Self::Draining,
        }
    }
}

/// Probe body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeView {
    pub status: Lifecycle,
}

/// Shared lifecycle flag read by the probes.
#[derive(Debug)]
pub struct HealthState(AtomicU8);

impl Default for HealthState {
    fn default() -> Self {
        Self(AtomicU8::new(Lifecycle::Starting.as_u8()))
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Startup work is finished; accept traffic.
    pub fn mark_ready(&self) {
        // Draining is terminal.
        let _ = self.0.compare_exchange(
            Lifecycle::Starting.as_u8(),
            Lifecycle::Ready.as_u8(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Stop advertising readiness and liveness ahead of shutdown.
    pub fn mark_draining(&self) {
        self.0.store(Lifecycle::Draining.as_u8(), Ordering::Release);
    }

    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_u8(self.0.load(Ordering::Acquire))
    }

    fn probe(&self, ok: bool) -> HttpResponse {
        let mut response = if ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(ProbeView {
                status: self.lifecycle(),
            })
    }
}

/// Readiness probe: 200 once startup work is done, 503 before and while draining.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Ready for traffic", body = ProbeView),
        (status = 503, description = "Starting or draining", body = ProbeView)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.probe(state.lifecycle() == Lifecycle::Ready)
}

/// Liveness probe: 200 until the process starts draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is alive", body = ProbeView),
        (status = 503, description = "Draining for shutdown", body = ProbeView)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.probe(state.lifecycle() != Lifecycle::Draining)
}
