//! Typed redirect cache in front of link persistence.

use super::service::CacheService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cached redirect target for a slug.
///
/// Advisory only: persistence always wins, and a cached entry is re-checked
/// against the stored link before a redirect is served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedRedirect {
    pub destination_url: String,
    pub click_count: i64,
}

/// Slug-keyed view over a [`CacheService`].
///
/// Keys are `url:{slug}` with the slug lowercased. Backend errors and
/// undecodable entries are logged and reported as misses.
#[derive(Clone)]
pub struct RedirectCache {
    backend: Arc<dyn CacheService>,
}

impl RedirectCache {
    pub fn new(backend: Arc<dyn CacheService>) -> Self {
        Self { backend }
    }

    fn key(slug: &str) -> String {
        format!("url:{}", slug.to_ascii_lowercase())
    }

    /// Looks up a slug. `None` is a miss.
    pub async fn get(&self, slug: &str) -> Option<CachedRedirect> {
        let raw = match self.backend.get(&Self::key(slug)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(slug, error = %e, "Redirect cache read failed");
                None
            }
        };

        let entry = raw.and_then(|raw| match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(slug, error = %e, "Discarding undecodable redirect cache entry");
                None
            }
        });

        if entry.is_some() {
            metrics::counter!("cache_hits_total", "cache" => "redirect").increment(1);
            debug!(slug, "Redirect cache HIT");
        } else {
            metrics::counter!("cache_misses_total", "cache" => "redirect").increment(1);
            debug!(slug, "Redirect cache MISS");
        }

        entry
    }

    pub async fn put(&self, slug: &str, entry: &CachedRedirect, ttl: Duration) {
        let raw = match serde_json::to_string(entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(slug, error = %e, "Failed to encode redirect cache entry");
                return;
            }
        };

        if let Err(e) = self.backend.set(&Self::key(slug), &raw, ttl).await {
            warn!(slug, error = %e, "Redirect cache write failed");
        }
    }

    pub async fn invalidate(&self, slug: &str) {
        if let Err(e) = self.backend.delete(&Self::key(slug)).await {
            warn!(slug, error = %e, "Redirect cache invalidation failed");
        }
    }

    pub fn backend(&self) -> &Arc<dyn CacheService> {
        &self.backend
    }
}
