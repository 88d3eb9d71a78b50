//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::storage::ObservationQuery;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe.
/// Returns 200 once the store answers a count.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match record_count(&state).await {
        Some(_) => StatusCode::OK,
        None => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let count = record_count(&state).await;

    Json(HealthResponse {
        status: if count.is_some() { "healthy" } else { "unhealthy" }.to_string(),
        storage: if count.is_some() { "ok" } else { "error" }.to_string(),
        records: count.unwrap_or(0),
        narrative_enabled: state.narrative_enabled(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn record_count(state: &AppState) -> Option<usize> {
    match state.store.count(&ObservationQuery::all()).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            None
        }
    }
}
