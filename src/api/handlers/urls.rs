//! Handlers for link creation and management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::urls::{CreateUrlRequest, UpdateUrlRequest, UrlListResponse, UrlResponse};
use crate::application::services::LinkDraft;
use crate::domain::entities::{Link, LinkPatch};
use crate::error::AppError;
use crate::state::AppState;

/// Links returned by `GET /api/urls`.
const RECENT_LIMIT: i64 = 20;

fn to_response(state: &AppState, link: Link) -> UrlResponse {
    UrlResponse {
        short_url: state.link_service.short_url(&link.slug),
        link,
    }
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://github.com/facebook/react",
///   "keywords": ["ui", "library"],     // optional
///   "customSlug": "react",             // optional
///   "clickLimit": 1000,                // optional
///   "expiresAt": "2026-12-31T00:00:00Z" // optional
/// }
/// ```
///
/// # Response (201 Created)
///
/// ```json
/// {
///   "id": 42,
///   "slug": "github.facebook.react",
///   "destinationUrl": "https://github.com/facebook/react",
///   "keywords": [],
///   "clickCount": 0,
///   "clickLimit": null,
///   "expiresAt": null,
///   "isActive": true,
///   "createdAt": "2026-10-17T09:30:00Z",
///   "updatedAt": "2026-10-17T09:30:00Z",
///   "shortUrl": "https://s.example.com/github.facebook.react"
/// }
/// ```
///
/// # Errors
///
/// - 400 `invalid_url` / `validation_error` for bad input
/// - 409 `slug_taken` if `customSlug` is already used; generated slugs are
///   suffixed automatically instead
pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create(LinkDraft {
            url: payload.url,
            keywords: payload.keywords,
            custom_slug: payload.custom_slug,
            click_limit: payload.click_limit,
            expires_at: payload.expires_at,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, link))))
}

/// Lists the 20 most recently created active links.
///
/// # Endpoint
///
/// `GET /api/urls`
pub async fn list_urls_handler(
    State(state): State<AppState>,
) -> Result<Json<UrlListResponse>, AppError> {
    let links = state.link_service.list_recent(RECENT_LIMIT).await?;
    let urls: Vec<UrlResponse> = links
        .into_iter()
        .map(|link| to_response(&state, link))
        .collect();

    Ok(Json(UrlListResponse {
        count: urls.len(),
        urls,
    }))
}

/// Returns one link, including inactive and expired ones.
///
/// # Endpoint
///
/// `GET /api/urls/{slug}`
pub async fn get_url_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<UrlResponse>, AppError> {
    let link = state.link_service.get(&slug).await?;
    Ok(Json(to_response(&state, link)))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/urls/{slug}`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/new", "isActive": true, "expiresAt": null, "clickLimit": 50 }
/// ```
///
/// The cached redirect is evicted before the response is sent.
pub async fn update_url_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateUrlRequest>,
) -> Result<Json<UrlResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update(&slug, LinkPatch::from(payload))
        .await?;

    Ok(Json(to_response(&state, link)))
}

/// Deactivates a link. The slug stays reserved.
///
/// # Endpoint
///
/// `DELETE /api/urls/{slug}`
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state.link_service.deactivate(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}
