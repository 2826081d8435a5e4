//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "cloudmart-api";

/// Health endpoint payload.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub build_time: String,
    pub database: &'static str,
    pub db_status: &'static str,
    pub deployed_via: String,
}

/// Whether the store answers its health check.
async fn store_reachable(state: &AppState) -> bool {
    match state.store() {
        Some(store) => match store.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Store health check failed");
                false
            }
        },
        None => false,
    }
}

/// Service status.
///
/// Always 200 while the process is serving; store trouble only shows up in
/// `db_status`.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let db_status = if store_reachable(&state).await {
        "connected"
    } else {
        "disconnected"
    };

    Json(HealthStatus {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        build_time: state.started_at().to_rfc3339(),
        database: state.store().map_or("none", |store| store.backend_name()),
        db_status,
        deployed_via: state.config().deployed_via.clone(),
    })
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if no store is configured or it is not
/// reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if store_reachable(&state).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
