//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Store**: backend ping (bounded by the store timeout)
/// 2. **Hit Queue**: channel is open; reports free capacity
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "backend": "postgres",
///   "checks": {
///     "store": { "status": "ok", "message": "Connected" },
///     "hit_queue": { "status": "ok", "message": "Capacity: 10000" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store = state.link_service.store();

    let store_check = match store.ping().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            CheckStatus::error("Store unreachable")
        }
    };

    let queue_check = if state.hit_sender.is_closed() {
        CheckStatus::error("Hit queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.hit_sender.capacity()))
    };

    let all_healthy = store_check.is_ok() && queue_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: store.backend_name().to_string(),
        checks: HealthChecks {
            store: store_check,
            hit_queue: queue_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
