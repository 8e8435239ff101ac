//! DTOs for the suggestion endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::SuggestionSource;
use crate::domain::suggestion::Suggestion;

fn default_count() -> usize {
    5
}

/// Request body for `POST /api/suggestions/generate`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSuggestionsRequest {
    pub url: String,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 keywords"))]
    pub keywords: Vec<String>,

    #[serde(default = "default_count")]
    #[validate(range(min = 1, max = 10))]
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct GenerateSuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
    pub metadata: SuggestionMetadata,
}

/// How the suggestions were produced.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionMetadata {
    pub source: SuggestionSource,
    pub cached: bool,
    pub count: usize,
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_pattern: Option<&'static str>,
    pub processing_time_ms: u64,
}
