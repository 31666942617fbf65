/// Service info and health check endpoints
///
/// # Endpoints
///
/// ```text
/// GET /        -> {"message": "Roster API is running!"}
/// GET /health  -> {"status": "healthy", "version": "0.1.0", "backend": "postgres", "store": "connected"}
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Service info response
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status ("healthy" or "degraded")
    pub status: String,

    /// Application version
    pub version: String,

    /// Store backend name
    pub backend: String,

    /// Store status ("connected" or "disconnected")
    pub store: String,
}

/// Liveness message
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Roster API is running!".to_string(),
    })
}

/// Health check handler
///
/// Pings the store; an unreachable store reports `degraded` rather than an
/// error status so that probes can tell the process itself is alive.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let store_status = match state.stores.health.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            "disconnected"
        }
    };

    Ok(Json(HealthResponse {
        status: if store_status == "connected" {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.stores.health.backend().to_string(),
        store: store_status.to_string(),
    }))
}
