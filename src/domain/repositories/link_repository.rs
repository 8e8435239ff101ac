//! Repository trait for link data access.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Persistence interface for links.
///
/// Slugs are compared case-insensitively: implementations lowercase the
/// lookup key. The storage layer's uniqueness constraint is the final
/// authority on slug ownership; any check a caller makes beforehand is
/// advisory only.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by slug, whatever its active or expiry state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError>;

    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken, including
    /// when a concurrent writer claimed it after the caller's existence check.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Partially updates a link.
    ///
    /// Returns `Ok(None)` when no link has this slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update(&self, slug: &str, patch: LinkPatch) -> Result<Option<Link>, AppError>;

    /// Increments the click counter of a link.
    ///
    /// Returns `Ok(false)` when no link has this slug.
    async fn record_click(&self, slug: &str) -> Result<bool, AppError>;

    /// Lists the most recently created active links, newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Link>, AppError>;

    /// Checks that the storage backend answers.
    async fn ping(&self) -> Result<(), AppError>;
}
