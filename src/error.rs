//! Application error type and its HTTP representation.
//!
//! Every service and handler returns [`AppError`]. The variants map onto the
//! error taxonomy exposed to API clients:
//!
//! | Variant | Status | Code |
//! |---|---|---|
//! | [`AppError::InvalidUrl`] | 400 | `invalid_url` |
//! | [`AppError::Validation`] | 400 | `validation_error` |
//! | [`AppError::NotFound`] | 404 | `not_found` |
//! | [`AppError::SlugTaken`] | 409 | `slug_taken` |
//! | [`AppError::Conflict`] | 409 | `conflict` |
//! | [`AppError::Gone`] | 410 | `gone` |
//! | [`AppError::Internal`] | 500 | `internal_error` |
//!
//! `Conflict` is what the storage layer raises when its uniqueness constraint
//! rejects an insert. For generated slugs it never reaches a client: the link
//! service catches it and retries with a freshly resolved alternate.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload, also embedded in batch-style responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("Slug '{slug}' is already taken")]
    SlugTaken { slug: String },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("{message}")]
    Gone { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn slug_taken(slug: impl Into<String>) -> Self {
        Self::SlugTaken { slug: slug.into() }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns true when the storage layer rejected a write on its uniqueness constraint.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidUrl { .. } => (StatusCode::BAD_REQUEST, "invalid_url"),
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::SlugTaken { .. } => (StatusCode::CONFLICT, "slug_taken"),
            AppError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            AppError::Gone { .. } => (StatusCode::GONE, "gone"),
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        let details = match self {
            AppError::SlugTaken { slug } => json!({ "slug": slug }),
            AppError::InvalidUrl { details, .. }
            | AppError::Validation { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Conflict { details, .. }
            | AppError::Gone { details, .. }
            | AppError::Internal { details, .. } => details.clone(),
        };

        ErrorInfo {
            code,
            message: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let field_errors = e.field_errors();
        let fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        AppError::bad_request(
            "Request validation failed",
            json!({ "fields": fields, "errors": e.to_string() }),
        )
    }
}
