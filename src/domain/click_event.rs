//! Click event model for asynchronous click counting.

/// A redirect that should be counted.
///
/// Sent from the redirect handler to the background worker over a bounded
/// channel so the HTTP response never waits on a database write. Only the
/// count is kept, so the slug is all the worker needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub slug: String,
}

impl ClickEvent {
    /// Builds an event for `slug` in stored (lowercase) form.
    pub fn new(slug: &str) -> Self {
        Self {
            slug: slug.to_ascii_lowercase(),
        }
    }
}
