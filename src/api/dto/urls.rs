//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use validator::Validate;

use crate::domain::entities::{Link, LinkPatch};

/// Request body for `POST /api/urls`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    pub url: String,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 keywords"))]
    pub keywords: Vec<String>,

    /// Exact slug to claim. Conflicts are reported, never auto-suffixed.
    #[validate(length(min = 1, max = 50))]
    pub custom_slug: Option<String>,

    #[validate(range(min = 1))]
    pub click_limit: Option<i64>,

    pub expires_at: Option<DateTime<Utc>>,
}

/// Request body for `PATCH /api/urls/{slug}`.
///
/// Only provided fields change. For `expiresAt` and `clickLimit`:
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear it
/// - **Value** → set it
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUrlRequest {
    /// New destination URL.
    pub url: Option<String>,

    pub is_active: Option<bool>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub click_limit: Option<Option<i64>>,
}

impl From<UpdateUrlRequest> for LinkPatch {
    fn from(req: UpdateUrlRequest) -> Self {
        LinkPatch {
            destination_url: req.url,
            is_active: req.is_active,
            expires_at: req.expires_at,
            click_limit: req.click_limit,
        }
    }
}

/// A link as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    #[serde(flatten)]
    pub link: Link,
    pub short_url: String,
}

#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub count: usize,
    pub urls: Vec<UrlResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let req: UpdateUrlRequest =
            serde_json::from_str(r#"{"expiresAt": null, "isActive": false}"#).unwrap();
        let patch = LinkPatch::from(req);

        assert_eq!(patch.expires_at, Some(None));
        assert_eq!(patch.click_limit, None);
        assert_eq!(patch.is_active, Some(false));
    }

    #[test]
    fn test_create_request_validation() {
        let req: CreateUrlRequest = serde_json::from_str(
            r#"{"url": "https://example.com", "customSlug": "", "clickLimit": 0}"#,
        )
        .unwrap();
        let errors = req.validate().unwrap_err();

        assert!(errors.field_errors().contains_key("custom_slug"));
        assert!(errors.field_errors().contains_key("click_limit"));
    }
}
