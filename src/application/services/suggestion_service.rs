//! AI-assisted slug suggestions with cache and heuristic fallback.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::domain::slug::{detect, fallback, sanitize};
use crate::domain::suggestion::{Suggestion, SuggestionStyle, synthesize};
use crate::infrastructure::ai::{
    AiBackend, AiError, AiPrompt, PromptContext, RawSuggestion, parse_suggestions,
};
use crate::infrastructure::cache::SuggestionCache;

/// Upper bound on suggestions per request.
pub const MAX_SUGGESTIONS: usize = 10;

/// Where a batch of suggestions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    Ai,
    Cache,
    Fallback,
}

/// Result of [`SuggestionService::generate`].
#[derive(Debug, Clone)]
pub struct SuggestionBatch {
    pub suggestions: Vec<Suggestion>,
    pub source: SuggestionSource,
    pub model: Option<String>,
    /// Why the backend was not used, when `source` is `Fallback`.
    pub fallback_reason: Option<&'static str>,
    pub elapsed: Duration,
}

/// Timing and presentation settings for [`SuggestionService`].
#[derive(Debug, Clone)]
pub struct SuggestionSettings {
    pub ai_timeout: Duration,
    pub slow_threshold: Duration,
    pub base_url: String,
}

/// Deadline-bound AI suggestions backed by a result cache, with the
/// heuristic generator as fallback.
///
/// Backend failures never leave this service: every call produces usable
/// slugs, and every surfaced slug has been through the sanitizer.
#[derive(Clone)]
pub struct SuggestionService {
    backend: Option<Arc<dyn AiBackend>>,
    cache: SuggestionCache,
    settings: SuggestionSettings,
}

impl SuggestionService {
    /// `backend` is `None` when no API key is configured; every request then
    /// goes straight to the fallback.
    pub fn new(
        backend: Option<Arc<dyn AiBackend>>,
        cache: SuggestionCache,
        settings: SuggestionSettings,
    ) -> Self {
        Self {
            backend,
            cache,
            settings,
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn model(&self) -> Option<String> {
        self.backend.as_ref().map(|b| b.model())
    }

    /// Generates up to `count` suggestions for `url`.
    ///
    /// Order of preference: cached AI result, fresh AI result, heuristic
    /// fallback. Only AI results are cached.
    pub async fn generate(&self, url: &str, keywords: &[String], count: usize) -> SuggestionBatch {
        let started = Instant::now();
        let count = count.clamp(1, MAX_SUGGESTIONS);

        if let Some(mut cached) = self.cache.get(url, keywords).await
            && cached.len() >= count
        {
            cached.truncate(count);
            return SuggestionBatch {
                suggestions: cached,
                source: SuggestionSource::Cache,
                model: self.model(),
                fallback_reason: None,
                elapsed: started.elapsed(),
            };
        }

        let Some(backend) = self.backend.as_deref() else {
            return SuggestionBatch {
                suggestions: self.fallback_suggestions(url, keywords, count),
                source: SuggestionSource::Fallback,
                model: None,
                fallback_reason: Some("disabled"),
                elapsed: started.elapsed(),
            };
        };

        match self.ask(backend, url, keywords, count).await {
            Ok(suggestions) => {
                self.cache.put(url, keywords, &suggestions).await;
                info!(url, count = suggestions.len(), "Generated AI suggestions");

                SuggestionBatch {
                    suggestions,
                    source: SuggestionSource::Ai,
                    model: Some(backend.model()),
                    fallback_reason: None,
                    elapsed: started.elapsed(),
                }
            }
            Err(e) => {
                warn!(url, error = %e, "AI suggestions unavailable, using fallback");
                metrics::counter!("ai_fallbacks_total", "reason" => e.kind()).increment(1);

                SuggestionBatch {
                    suggestions: self.fallback_suggestions(url, keywords, count),
                    source: SuggestionSource::Fallback,
                    model: Some(backend.model()),
                    fallback_reason: Some(e.kind()),
                    elapsed: started.elapsed(),
                }
            }
        }
    }

    /// Produces a single slug for link creation.
    ///
    /// Uses the first AI suggestion when the backend answers in time,
    /// otherwise the keyword/domain heuristic. Never empty.
    pub async fn generate_one(&self, url: &str, keywords: &[String]) -> String {
        if let Some(first) = self
            .cache
            .get(url, keywords)
            .await
            .and_then(|list| list.into_iter().next())
        {
            return first.slug;
        }

        if let Some(backend) = self.backend.as_deref() {
            match self.ask(backend, url, keywords, 1).await {
                Ok(suggestions) => {
                    self.cache.put(url, keywords, &suggestions).await;
                    if let Some(first) = suggestions.into_iter().next() {
                        return first.slug;
                    }
                }
                Err(e) => {
                    warn!(url, error = %e, "AI slug unavailable, using fallback");
                    metrics::counter!("ai_fallbacks_total", "reason" => e.kind()).increment(1);
                }
            }
        }

        heuristic_slug(keywords, url)
    }

    /// Calls the backend under the configured deadline and post-processes
    /// its answer.
    async fn ask(
        &self,
        backend: &dyn AiBackend,
        url: &str,
        keywords: &[String],
        count: usize,
    ) -> Result<Vec<Suggestion>, AiError> {
        let detected = detect(url);
        let prompt = AiPrompt::for_suggestions(&PromptContext {
            url,
            keywords,
            count,
            detected: Some(&detected),
        });

        let timeout = self.settings.ai_timeout;
        let started = Instant::now();

        // A call past the deadline is dropped, not awaited.
        let text = tokio::time::timeout(timeout, backend.complete(&prompt, timeout))
            .await
            .map_err(|_| AiError::Timeout(timeout))??;

        let elapsed = started.elapsed();
        if elapsed > self.settings.slow_threshold {
            warn!(
                url,
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = self.settings.slow_threshold.as_millis() as u64,
                "Slow AI completion"
            );
        }

        let raw = parse_suggestions(&text)?;
        let suggestions = self.refine(raw, url, keywords, count);

        if suggestions.is_empty() {
            return Err(AiError::InvalidResponse(
                "No usable slugs after sanitization".to_string(),
            ));
        }

        Ok(suggestions)
    }

    /// Sanitizes, deduplicates and completes a raw model answer.
    ///
    /// Missing styles are inferred from the slug's words, missing reasoning
    /// comes from the style, and missing confidence decreases with position.
    /// When the model returned fewer than `count` usable slugs, synthesized
    /// suggestions for the unused styles fill the gap.
    fn refine(
        &self,
        raw: Vec<RawSuggestion>,
        url: &str,
        keywords: &[String],
        count: usize,
    ) -> Vec<Suggestion> {
        let base_url = &self.settings.base_url;
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(count);

        for (i, item) in raw.into_iter().enumerate() {
            if out.len() >= count {
                break;
            }

            let slug = sanitize(&item.slug);
            if slug.is_empty() || !seen.insert(slug.clone()) {
                continue;
            }

            let style = item
                .style
                .as_deref()
                .and_then(SuggestionStyle::parse)
                .unwrap_or_else(|| SuggestionStyle::infer(&item.slug, i));
            let confidence = item
                .confidence
                .filter(|c| c.is_finite())
                .unwrap_or(0.9 - 0.05 * i as f64);
            let reasoning = item
                .reasoning
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| style.reasoning().to_string());

            out.push(Suggestion::new(slug, style, confidence, reasoning, base_url));
        }

        if !out.is_empty() && out.len() < count {
            let used: HashSet<SuggestionStyle> = out.iter().map(|s| s.style).collect();
            let missing: Vec<SuggestionStyle> = SuggestionStyle::ALL
                .into_iter()
                .filter(|s| !used.contains(s))
                .collect();

            for extra in synthesize(url, keywords, &missing, base_url) {
                if out.len() >= count {
                    break;
                }
                if seen.insert(extra.slug.clone()) {
                    out.push(extra);
                }
            }
        }

        out
    }

    /// Heuristic suggestions: the keyword/domain slug first, then one
    /// synthesized suggestion per style.
    fn fallback_suggestions(&self, url: &str, keywords: &[String], count: usize) -> Vec<Suggestion> {
        let base_url = &self.settings.base_url;
        let primary = heuristic_slug(keywords, url);

        let mut seen = HashSet::from([primary.clone()]);
        let mut out = vec![Suggestion::new(
            primary.clone(),
            SuggestionStyle::infer(&primary, 0),
            0.8,
            "Derived from keywords and URL structure".to_string(),
            base_url,
        )];

        for extra in synthesize(url, keywords, &SuggestionStyle::ALL, base_url) {
            if seen.insert(extra.slug.clone()) {
                out.push(extra);
            }
        }

        out.truncate(count);
        out
    }
}

/// The heuristic slug in stored form, never empty.
fn heuristic_slug(keywords: &[String], url: &str) -> String {
    let slug = sanitize(&fallback(keywords, url));
    if slug.is_empty() {
        "link".to_string()
    } else {
        slug
    }
}
