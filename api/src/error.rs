//! Unified error types for the RKSC ledger API
//!
//! This module defines error types for each layer:
//! - `StorageError`: Blob storage adapter errors
//! - `DomainError`: Core ledger errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Blob storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Namespace not found: {0}")]
    NamespaceNotFound(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Unauthorized - invalid access token")]
    Unauthorized,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Domain layer errors - ledger rules and record handling
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Corrupt member record {path}: {reason}")]
    CorruptRecord { path: String, reason: String },

    #[error("No member IDs left for prefix {0}")]
    MemberIdsExhausted(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::MemberNotFound(id)) => (
                StatusCode::NOT_FOUND,
                "Member not found",
                Some(format!("No member with ID {}", id)),
            ),
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::CorruptRecord { path, reason }) => {
                tracing::error!("Corrupt record {}: {}", path, reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Corrupt member record",
                    None,
                )
            }
            AppError::Domain(DomainError::MemberIdsExhausted(prefix)) => {
                tracing::error!("Member IDs exhausted for prefix {}", prefix);
                (StatusCode::CONFLICT, "No member IDs left", None)
            }
            AppError::Domain(DomainError::Storage(e)) => {
                tracing::error!("Storage error: {}", e);
                match e {
                    StorageError::RateLimited => {
                        (StatusCode::TOO_MANY_REQUESTS, "Rate limited", None)
                    }
                    StorageError::Api { .. } | StorageError::Request(_) => {
                        (StatusCode::BAD_GATEWAY, "Storage service error", None)
                    }
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Storage service error",
                        None,
                    ),
                }
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Domain(DomainError::Storage(e))
    }
}

/// Parse error for month values such as `JAN25`
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid month '{0}', expected a value like JAN25")]
pub struct MonthParseError(pub String);

impl From<MonthParseError> for AppError {
    fn from(e: MonthParseError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}
