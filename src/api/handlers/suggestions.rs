//! Handler for AI slug suggestions.

use axum::{Json, extract::State};
use serde_json::json;
use validator::Validate;

use crate::api::dto::suggestions::{
    GenerateSuggestionsRequest, GenerateSuggestionsResponse, SuggestionMetadata,
};
use crate::application::services::SuggestionSource;
use crate::domain::slug::detect;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_normalizer::normalize_url;

/// Generates slug suggestions for a destination URL.
///
/// # Endpoint
///
/// `POST /api/suggestions/generate`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://www.hoka.com/en/us/mens-road/clifton-9/1127895.html",
///   "keywords": ["running", "cushioned"],   // optional
///   "count": 5                              // optional, 1-10
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "suggestions": [
///     {
///       "id": "q3Zr0b1xYk2L",
///       "slug": "hoka.clifton.9",
///       "style": "brand_focused",
///       "confidence": 0.95,
///       "reasoning": "Starts with trusted brand name for recognition",
///       "previewUrl": "https://s.example.com/hoka.clifton.9"
///     }
///   ],
///   "metadata": {
///     "source": "ai",
///     "cached": false,
///     "count": 5,
///     "model": "claude-3-haiku-20240307",
///     "processingTimeMs": 1240
///   }
/// }
/// ```
///
/// AI failures never surface here: the response then carries heuristic
/// suggestions with `source: "fallback"` and a `fallbackReason`.
///
/// # Errors
///
/// Returns 400 for an invalid URL, too many keywords or a count outside 1-10.
pub async fn generate_suggestions_handler(
    State(state): State<AppState>,
    Json(payload): Json<GenerateSuggestionsRequest>,
) -> Result<Json<GenerateSuggestionsResponse>, AppError> {
    payload.validate()?;

    let url = normalize_url(&payload.url).map_err(|e| {
        AppError::invalid_url("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    let batch = state
        .suggestion_service
        .generate(&url, &payload.keywords, payload.count)
        .await;

    let detected = detect(&url);

    Ok(Json(GenerateSuggestionsResponse {
        metadata: SuggestionMetadata {
            source: batch.source,
            cached: batch.source == SuggestionSource::Cache,
            count: batch.suggestions.len(),
            model: batch.model,
            fallback_reason: batch.fallback_reason,
            detected_pattern: detected.matched.then_some(detected.pattern_name),
            processing_time_ms: batch.elapsed.as_millis() as u64,
        },
        suggestions: batch.suggestions,
    }))
}
