//! Lenient parsing of model answers into candidate slugs.
//!
//! Models do not reliably follow output instructions, so several shapes are
//! accepted, tried in order:
//!
//! 1. A fenced code block is unwrapped first.
//! 2. A bare JSON array of objects or strings.
//! 3. An object with a `suggestions` or `data` array (or any array value).
//! 4. A regex scan for `"slug": "..."` pairs in otherwise broken JSON.

use super::error::AiError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap());

static SLUG_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""slug"\s*:\s*"([^"]+)""#).unwrap());

/// One suggestion as returned by the model, before sanitization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSuggestion {
    pub slug: String,
    pub style: Option<String>,
    pub confidence: Option<f64>,
    pub reasoning: Option<String>,
}

/// Extracts raw suggestions from a model answer.
///
/// # Errors
///
/// Returns [`AiError::InvalidResponse`] when no slug can be found at all.
pub fn parse_suggestions(text: &str) -> Result<Vec<RawSuggestion>, AiError> {
    let text = text.trim();
    let body = FENCED_BLOCK
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or(text, |m| m.as_str());

    let parsed = match serde_json::from_str::<Value>(body) {
        Ok(value) => from_value(value),
        Err(_) => Vec::new(),
    };

    let suggestions = if parsed.is_empty() {
        SLUG_FIELD
            .captures_iter(text)
            .map(|c| RawSuggestion {
                slug: c[1].to_string(),
                ..Default::default()
            })
            .collect()
    } else {
        parsed
    };

    if suggestions.is_empty() {
        let preview: String = text.chars().take(200).collect();
        return Err(AiError::InvalidResponse(format!(
            "No slugs found in model output: {}",
            preview
        )));
    }

    Ok(suggestions)
}

fn from_value(value: Value) -> Vec<RawSuggestion> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let keyed = ["suggestions", "data"]
                .iter()
                .find_map(|k| match map.remove(*k) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                });
            match keyed {
                Some(items) => items,
                None => map
                    .into_iter()
                    .find_map(|(_, v)| match v {
                        Value::Array(items) => Some(items),
                        _ => None,
                    })
                    .unwrap_or_default(),
            }
        }
        _ => Vec::new(),
    };

    items.into_iter().filter_map(from_item).collect()
}

fn from_item(item: Value) -> Option<RawSuggestion> {
    match item {
        Value::String(slug) => Some(RawSuggestion {
            slug,
            ..Default::default()
        }),
        Value::Object(map) => {
            let slug = map.get("slug")?.as_str()?.to_string();
            Some(RawSuggestion {
                slug,
                style: map.get("style").and_then(Value::as_str).map(String::from),
                confidence: map.get("confidence").and_then(Value::as_f64),
                reasoning: map
                    .get("reasoning")
                    .and_then(Value::as_str)
                    .map(String::from),
            })
        }
        _ => None,
    }
}
