//! API route configuration.

use crate::api::handlers::{
    check_slug_handler, create_url_handler, delete_url_handler, detect_pattern_handler,
    generate_suggestions_handler, get_url_handler, list_patterns_handler, list_urls_handler,
    update_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// AI-backed suggestion routes.
///
/// # Endpoints
///
/// - `POST /suggestions/generate` - Generate slug suggestions for a URL
pub fn suggestion_routes() -> Router<AppState> {
    Router::new().route("/suggestions/generate", post(generate_suggestions_handler))
}

/// Slug engine and link management routes.
///
/// # Endpoints
///
/// - `POST   /slug/detect-pattern` - Run the site pattern detector
/// - `GET    /slug/patterns`       - List supported site patterns
/// - `GET    /slug/check/{slug}`   - Availability and alternatives
/// - `POST   /urls`                - Create a link
/// - `GET    /urls`                - 20 most recent active links
/// - `GET    /urls/{slug}`         - Fetch a link
/// - `PATCH  /urls/{slug}`         - Partially update a link
/// - `DELETE /urls/{slug}`         - Deactivate a link
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/slug/detect-pattern", post(detect_pattern_handler))
        .route("/slug/patterns", get(list_patterns_handler))
        .route("/slug/check/{slug}", get(check_slug_handler))
        .route("/urls", post(create_url_handler).get(list_urls_handler))
        .route(
            "/urls/{slug}",
            get(get_url_handler)
                .patch(update_url_handler)
                .delete(delete_url_handler),
        )
}
