//! Error taxonomy: typed service failures and their HTTP projection.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::{catalog::CatalogError, dao::storage::StorageError};

/// Errors that can occur in service layer operations.
///
/// Components fail fast with one of these; nothing in the pipeline retries.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required field is missing or malformed (user-correctable).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The user is authenticated but not on the playlist's access list.
    #[error("access denied: {0}")]
    AccessDenied(String),
    /// Requested resource (or history) does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The external catalog or link resolution failed.
    #[error("catalog failure")]
    Upstream(#[source] CatalogError),
    /// The document store failed a read or write.
    #[error("storage failure")]
    Persistence(#[source] StorageError),
    /// No storage backend is installed (degraded mode).
    #[error("storage unavailable (degraded mode)")]
    Degraded,
}

impl From<CatalogError> for ServiceError {
    fn from(err: CatalogError) -> Self {
        match err {
            // Unresolvable links and unknown catalog resources are 404s for
            // the caller, not upstream faults.
            CatalogError::InvalidLink(message) => ServiceError::NotFound(message),
            CatalogError::NotFound(message) => ServiceError::NotFound(message),
            other => ServiceError::Upstream(other),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Persistence(err)
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// Authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),
    /// Requested resource not found.
    #[error("{0}")]
    NotFound(String),
    /// Upstream or storage failure the caller cannot correct.
    #[error("{0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::AccessDenied(message) => AppError::Forbidden(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Upstream(source) => AppError::Internal(source.to_string()),
            ServiceError::Persistence(source) => AppError::Internal(source.to_string()),
            ServiceError::Degraded => AppError::Internal("storage unavailable".into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            error: self.to_string(),
        });

        (status, payload).into_response()
    }
}
