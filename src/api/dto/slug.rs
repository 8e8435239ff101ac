//! DTOs for slug pattern and availability endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::slug::PatternInfo;

/// Request body for `POST /api/slug/detect-pattern`.
#[derive(Debug, Deserialize)]
pub struct DetectPatternRequest {
    pub url: String,
}

/// Response for `GET /api/slug/patterns`.
#[derive(Debug, Serialize)]
pub struct PatternsResponse {
    pub count: usize,
    pub patterns: Vec<PatternInfo>,
}
