//! Handler for short link redirects.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a slug to its destination.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Request Flow
///
/// 1. Look up the redirect cache (key `url:{slug}`)
/// 2. Re-check the stored link on a hit; read storage on a miss
/// 3. Populate the cache in the background after a miss
/// 4. Queue a click event for the background worker
/// 5. Return 307 Temporary Redirect
///
/// # Click Tracking
///
/// Click events go to a bounded channel. If the queue is full the click is
/// dropped; the redirect is never delayed.
///
/// # Errors
///
/// Returns 404 for unknown or deactivated slugs and 410 Gone for links past
/// their expiry date or click limit.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let destination = state.link_service.resolve_redirect(&slug).await?;

    match state.click_sender.try_send(ClickEvent::new(&slug)) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            debug!(slug = %event.slug, "Click queue full, click dropped");
        }
        Err(TrySendError::Closed(_)) => {
            debug!(%slug, "Click queue closed");
        }
    }

    Ok(Redirect::temporary(&destination))
}
