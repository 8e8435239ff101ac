#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use smartlink::application::services::{LinkSettings, SuggestionSettings};
use smartlink::domain::click_event::ClickEvent;
use smartlink::domain::entities::{Link, NewLink};
use smartlink::domain::repositories::LinkRepository;
use smartlink::infrastructure::cache::MemoryCache;
use smartlink::infrastructure::persistence::InMemoryLinkRepository;
use smartlink::routes;
use smartlink::state::{AppState, StateParts};

pub const BASE_URL: &str = "https://s.example.com";

/// State backed by in-memory storage and cache, with AI disabled.
pub fn create_test_state() -> (AppState, mpsc::Receiver<ClickEvent>) {
    create_test_state_with_queue(100)
}

pub fn create_test_state_with_queue(
    capacity: usize,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(capacity);

    let state = AppState::new(StateParts {
        repository: Arc::new(InMemoryLinkRepository::new()),
        cache: Arc::new(MemoryCache::new()),
        ai_backend: None,
        click_sender: tx,
        links: LinkSettings {
            base_url: BASE_URL.to_string(),
            redirect_ttl: Duration::from_secs(3_600),
            creation_ttl: Duration::from_secs(86_400),
        },
        suggestions: SuggestionSettings {
            ai_timeout: Duration::from_secs(5),
            slow_threshold: Duration::from_secs(2),
            base_url: BASE_URL.to_string(),
        },
        suggestion_cache_ttl: Duration::from_secs(3_600),
    });

    (state, rx)
}

/// Full route tree without rate limiting, which needs a peer address.
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(routes::routes().with_state(state)).unwrap()
}

pub async fn create_test_link(state: &AppState, slug: &str, url: &str) -> Link {
    state
        .repository
        .create(NewLink {
            slug: slug.to_string(),
            destination_url: url.to_string(),
            keywords: vec![],
            click_limit: None,
            expires_at: None,
        })
        .await
        .unwrap()
}

pub async fn create_limited_link(state: &AppState, slug: &str, url: &str, limit: i64) -> Link {
    state
        .repository
        .create(NewLink {
            slug: slug.to_string(),
            destination_url: url.to_string(),
            keywords: vec![],
            click_limit: Some(limit),
            expires_at: None,
        })
        .await
        .unwrap()
}

pub async fn create_expired_link(state: &AppState, slug: &str, url: &str) -> Link {
    state
        .repository
        .create(NewLink {
            slug: slug.to_string(),
            destination_url: url.to_string(),
            keywords: vec![],
            click_limit: None,
            expires_at: Some(chrono::Utc::now() - chrono::Duration::hours(1)),
        })
        .await
        .unwrap()
}
