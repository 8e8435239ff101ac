//! Link entity representing a slug to destination mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A shortened link.
///
/// `slug` is stored lowercase; uniqueness is enforced by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: i64,
    pub slug: String,
    pub destination_url: String,
    pub keywords: Vec<String>,
    pub click_count: i64,
    pub click_limit: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if the link passed its expiry date or used up its click limit.
    pub fn is_expired(&self) -> bool {
        let date_expired = self.expires_at.is_some_and(|e| Utc::now() >= e);
        let clicks_exhausted = self.click_limit.is_some_and(|l| self.click_count >= l);
        date_expired || clicks_exhausted
    }

    /// Returns true if a redirect may be served for this link.
    pub fn is_servable(&self) -> bool {
        self.is_active && !self.is_expired()
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub slug: String,
    pub destination_url: String,
    pub keywords: Vec<String>,
    pub click_limit: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
/// `click_limit` follows the same rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkPatch {
    pub destination_url: Option<String>,
    pub is_active: Option<bool>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub click_limit: Option<Option<i64>>,
}

impl LinkPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.destination_url.is_none()
            && self.is_active.is_none()
            && self.expires_at.is_none()
            && self.click_limit.is_none()
    }

    /// Applies the patch to `link` in place.
    pub fn apply(&self, link: &mut Link) {
        if let Some(url) = &self.destination_url {
            link.destination_url = url.clone();
        }
        if let Some(active) = self.is_active {
            link.is_active = active;
        }
        if let Some(expires_at) = self.expires_at {
            link.expires_at = expires_at;
        }
        if let Some(limit) = self.click_limit {
            link.click_limit = limit;
        }
        link.updated_at = Utc::now();
    }
}

#[cfg(test)]
pub(crate) fn test_link(slug: &str, url: &str) -> Link {
    let now = Utc::now();
    Link {
        id: 1,
        slug: slug.to_string(),
        destination_url: url.to_string(),
        keywords: Vec::new(),
        click_count: 0,
        click_limit: None,
        expires_at: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
