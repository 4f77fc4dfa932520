//! Liveness and readiness probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use super::state::AppState;
use super::types::Json;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    fn status_code(self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_store: Option<StoreProbe>,
}

/// Outcome of pinging the cost store
#[derive(Debug, Serialize)]
pub struct StoreProbe {
    pub status: HealthStatus,
    pub latency_ms: u64,
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: VERSION,
        cost_store: None,
    })
}

/// GET /ready - 503 while the cost store does not answer
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let probe = probe_cost_store(&state).await;
    let status = probe.status;

    (
        status.status_code(),
        Json(HealthResponse {
            status,
            version: VERSION,
            cost_store: Some(probe),
        }),
    )
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn probe_cost_store(state: &AppState) -> StoreProbe {
    let start = Instant::now();

    let status = match state.cost_service.ping().await {
        Ok(()) => HealthStatus::Healthy,
        Err(e) => {
            // Store details stay in the logs.
            warn!(error = %e, "Cost store ping failed");
            HealthStatus::Unhealthy
        }
    };

    StoreProbe {
        status,
        latency_ms: start.elapsed().as_millis() as u64,
    }
}
