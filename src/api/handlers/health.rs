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
/// - **200 OK**: Storage, cache and click queue healthy
/// - **503 Service Unavailable**: One of them is degraded
///
/// The AI check is informational: without a backend the service still
/// creates slugs through the heuristic generator.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Connected" },
///     "cache": { "status": "ok", "message": "redis" },
///     "click_queue": { "status": "ok", "message": "Capacity: 10000" },
///     "ai": { "status": "ok", "message": "claude-3-haiku-20240307" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = check_storage(&state).await;
    let cache = check_cache(&state).await;
    let click_queue = check_click_queue(&state);
    let ai = check_ai(&state);

    let all_healthy = storage.is_ok() && cache.is_ok() && click_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage,
            cache,
            click_queue,
            ai,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match state.repository.ping().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Storage error: {}", e)),
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = state.cache.backend_name();

    if state.cache.health_check().await {
        CheckStatus::ok(backend)
    } else {
        CheckStatus::error(format!("{} unreachable", backend))
    }
}

fn check_click_queue(state: &AppState) -> CheckStatus {
    if state.click_sender.is_closed() {
        CheckStatus::error("Click queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.click_sender.capacity()))
    }
}

fn check_ai(state: &AppState) -> CheckStatus {
    match state.suggestion_service.model() {
        Some(model) => CheckStatus::ok(model),
        None => CheckStatus {
            status: "disabled".to_string(),
            message: Some("Heuristic suggestions only".to_string()),
        },
    }
}
