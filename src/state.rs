//! Shared application state injected into handlers.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::application::services::{
    LinkService, LinkSettings, SuggestionService, SuggestionSettings,
};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::ai::AiBackend;
use crate::infrastructure::cache::{CacheService, RedirectCache, SuggestionCache};

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub suggestion_service: Arc<SuggestionService>,
    pub repository: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
}

/// Everything needed to assemble the services.
pub struct StateParts {
    pub repository: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
    pub ai_backend: Option<Arc<dyn AiBackend>>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub links: LinkSettings,
    pub suggestions: SuggestionSettings,
    pub suggestion_cache_ttl: Duration,
}

impl AppState {
    /// Wires the services on top of the given storage, cache and AI backend.
    ///
    /// The redirect and suggestion caches share `cache` under separate key
    /// prefixes.
    pub fn new(parts: StateParts) -> Self {
        let suggestion_service = SuggestionService::new(
            parts.ai_backend,
            SuggestionCache::new(parts.cache.clone(), parts.suggestion_cache_ttl),
            parts.suggestions,
        );

        let link_service = LinkService::new(
            parts.repository.clone(),
            suggestion_service.clone(),
            RedirectCache::new(parts.cache.clone()),
            parts.links,
        );

        Self {
            link_service: Arc::new(link_service),
            suggestion_service: Arc::new(suggestion_service),
            repository: parts.repository,
            cache: parts.cache,
            click_sender: parts.click_sender,
        }
    }
}
