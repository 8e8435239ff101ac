//! Handlers for pattern detection and slug availability.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::slug::{DetectPatternRequest, PatternsResponse};
use crate::application::services::Resolution;
use crate::domain::slug::{DetectionResult, detect, patterns::supported_patterns};
use crate::error::AppError;
use crate::state::AppState;

/// Detects the site pattern of a URL.
///
/// # Endpoint
///
/// `POST /api/slug/detect-pattern`
///
/// # Response
///
/// ```json
/// {
///   "matched": true,
///   "patternName": "GitHub",
///   "template": "GitHub.{Username}.{RepoName}",
///   "extracted": { "username": "facebook", "repo": "react" },
///   "suggestedSlug": "GitHub.facebook.react",
///   "confidence": "high"
/// }
/// ```
///
/// Unknown sites answer `matched: false` with `patternName: "Generic"`.
pub async fn detect_pattern_handler(
    Json(payload): Json<DetectPatternRequest>,
) -> Json<DetectionResult> {
    Json(detect(payload.url.trim()))
}

/// Lists the supported site patterns in priority order.
///
/// # Endpoint
///
/// `GET /api/slug/patterns`
pub async fn list_patterns_handler() -> Json<PatternsResponse> {
    let patterns = supported_patterns();

    Json(PatternsResponse {
        count: patterns.len(),
        patterns,
    })
}

/// Checks whether a slug is free.
///
/// # Endpoint
///
/// `GET /api/slug/check/{slug}`
///
/// # Response
///
/// ```json
/// {
///   "slug": "Amazon.Product",
///   "available": false,
///   "suggestions": [
///     { "slug": "Amazon.Product.2", "type": "numbered", "available": true },
///     { "slug": "Amazon.Product.3", "type": "numbered", "available": true },
///     { "slug": "Amazon.Product.4", "type": "numbered", "available": true }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if the slug does not follow the slug grammar.
pub async fn check_slug_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Resolution>, AppError> {
    let resolution = state.link_service.check_slug(&slug).await?;
    Ok(Json(resolution))
}
