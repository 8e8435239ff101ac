//! Slug availability checks and collision alternatives.

use chrono::{Datelike, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::repositories::LinkRepository;
use crate::domain::slug::{is_reserved, with_suffix};
use crate::error::AppError;

/// Alternates offered at most per resolution.
const MAX_ALTERNATIVES: usize = 3;

/// Highest numbered suffix tried (`.2` through `.5`).
const MAX_NUMBERED_SUFFIX: u32 = 5;

/// How an alternative was derived from the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlternativeKind {
    Numbered,
    Shorter,
    Dated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: AlternativeKind,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub slug: String,
    pub available: bool,
    pub suggestions: Vec<Alternative>,
}

/// Checks candidate slugs against persistence and proposes free alternates.
///
/// Reads only the authoritative store, never the redirect cache. The answer
/// is advisory: a concurrent writer may claim a slug between this check and
/// the caller's insert, in which case the insert fails with a conflict and
/// the caller resolves again.
#[derive(Clone)]
pub struct SlugResolver {
    repository: Arc<dyn LinkRepository>,
}

impl SlugResolver {
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self { repository }
    }

    /// Returns true if `slug` is not a reserved route word and no link
    /// (active or not) holds it.
    pub async fn is_free(&self, slug: &str) -> Result<bool, AppError> {
        if is_reserved(slug) {
            return Ok(false);
        }
        Ok(self.repository.find_by_slug(slug).await?.is_none())
    }

    /// Resolves `candidate`.
    ///
    /// A free candidate comes back as-is with no alternatives. A taken one
    /// gets up to three verified-free alternates, tried in fixed order:
    ///
    /// 1. `candidate.2` to `candidate.5`, lowest first
    /// 2. `candidate` minus its last segment, if it has more than two
    /// 3. `candidate.{current year}`
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, candidate: &str) -> Result<Resolution, AppError> {
        if self.is_free(candidate).await? {
            return Ok(Resolution {
                slug: candidate.to_string(),
                available: true,
                suggestions: Vec::new(),
            });
        }

        let mut suggestions = Vec::with_capacity(MAX_ALTERNATIVES);

        for (slug, kind) in alternates(candidate, Utc::now().year()) {
            if suggestions.len() >= MAX_ALTERNATIVES {
                break;
            }
            if suggestions.iter().any(|a: &Alternative| a.slug.eq_ignore_ascii_case(&slug)) {
                continue;
            }
            if self.is_free(&slug).await? {
                suggestions.push(Alternative {
                    slug,
                    kind,
                    available: true,
                });
            }
        }

        Ok(Resolution {
            slug: candidate.to_string(),
            available: false,
            suggestions,
        })
    }
}

/// All alternates for `candidate`, in the order they are tried.
fn alternates(candidate: &str, year: i32) -> Vec<(String, AlternativeKind)> {
    let mut out: Vec<(String, AlternativeKind)> = (2..=MAX_NUMBERED_SUFFIX)
        .map(|n| (with_suffix(candidate, &n.to_string()), AlternativeKind::Numbered))
        .collect();

    let segments: Vec<&str> = candidate.split('.').collect();
    if segments.len() > 2 {
        let shorter = segments[..segments.len() - 1].join(".");
        out.push((shorter, AlternativeKind::Shorter));
    }

    out.push((with_suffix(candidate, &year.to_string()), AlternativeKind::Dated));

    out
}
