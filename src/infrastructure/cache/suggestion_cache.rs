//! Cache for generated slug suggestions.

use super::service::CacheService;
use crate::domain::suggestion::Suggestion;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Suggestion lists keyed by a digest of the normalized `(url, keywords)` pair.
///
/// Logically separate from the redirect cache even when both share a
/// backend: keys live under `suggest:`.
#[derive(Clone)]
pub struct SuggestionCache {
    backend: Arc<dyn CacheService>,
    ttl: Duration,
}

impl SuggestionCache {
    pub fn new(backend: Arc<dyn CacheService>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Builds the cache key. Keyword order and case do not matter.
    pub fn key(url: &str, keywords: &[String]) -> String {
        let mut normalized: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        normalized.sort();
        normalized.dedup();

        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hasher.update([0u8]);
        hasher.update(normalized.join("\u{1f}").as_bytes());

        format!("suggest:{}", hex::encode(hasher.finalize()))
    }

    /// Looks up the suggestions for `(url, keywords)`. `None` is a miss.
    pub async fn get(&self, url: &str, keywords: &[String]) -> Option<Vec<Suggestion>> {
        let key = Self::key(url, keywords);
        let raw = match self.backend.get(&key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(url, error = %e, "Suggestion cache read failed");
                None
            }
        };

        let list = raw.and_then(|raw| match serde_json::from_str(&raw) {
            Ok(list) => Some(list),
            Err(e) => {
                warn!(url, error = %e, "Discarding undecodable suggestion cache entry");
                None
            }
        });

        if list.is_some() {
            metrics::counter!("cache_hits_total", "cache" => "suggestion").increment(1);
            debug!(url, "Suggestion cache HIT");
        } else {
            metrics::counter!("cache_misses_total", "cache" => "suggestion").increment(1);
            debug!(url, "Suggestion cache MISS");
        }

        list
    }

    pub async fn put(&self, url: &str, keywords: &[String], suggestions: &[Suggestion]) {
        let key = Self::key(url, keywords);
        let raw = match serde_json::to_string(suggestions) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(url, error = %e, "Failed to encode suggestion cache entry");
                return;
            }
        };

        if let Err(e) = self.backend.set(&key, &raw, self.ttl).await {
            warn!(url, error = %e, "Suggestion cache write failed");
        }
    }
}
