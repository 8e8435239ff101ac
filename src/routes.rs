//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{slug}`   - Short link redirect
//! - `GET  /health`   - Health check: storage, cache, click queue, AI
//! - `/api/*`         - Suggestion, slug and link management API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter on AI suggestions
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes without rate limiting or tracing.
///
/// Used by [`app_router`] and by tests, which have no peer address for the
/// per-IP limiter to key on.
pub fn routes() -> Router<AppState> {
    let api_router = Router::new()
        .merge(api::routes::suggestion_routes())
        .merge(api::routes::link_routes());

    Router::new()
        .route("/health", get(health_handler))
        .route("/{slug}", get(redirect_handler))
        .nest("/api", api_router)
}

/// Constructs the application router with all routes and middleware.
///
/// The server must be started with connect info, since rate limiting keys
/// on the peer address.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = Router::new()
        .merge(api::routes::suggestion_routes().layer(rate_limit::suggestion_layer()))
        .merge(api::routes::link_routes().layer(rate_limit::layer()));

    let redirects = Router::new()
        .route("/{slug}", get(redirect_handler))
        .layer(rate_limit::layer());

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(redirects)
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
