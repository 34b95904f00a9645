use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

/// Standard error envelope returned by every handler.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Not Found",
    "message": "Component 550e8400-e29b-41d4-a716-446655440000 not found",
    "details": null,
    "timestamp": "2026-08-25T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Unprocessable Entity")
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "Component 550e8400-e29b-41d4-a716-446655440000 not found")]
    pub message: String,
    /// Additional error details (validation errors, field breakdowns)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// ISO 8601 timestamp when the error occurred
    #[schema(example = "2026-08-25T10:30:00.000Z")]
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        sea_orm::error::DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error(
        "Insufficient stock for component {component_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        component_id: Uuid,
        available: Decimal,
        requested: Decimal,
    },

    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    #[error("Operation timed out: {0}")]
    OperationTimeout(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for ServiceError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        ServiceError::OperationTimeout("operation exceeded its deadline".to_string())
    }
}

/// Unwraps sea-orm's transaction wrapper so service code can use `?` on
/// `db.transaction(...)` results.
impl From<sea_orm::TransactionError<ServiceError>> for ServiceError {
    fn from(err: sea_orm::TransactionError<ServiceError>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(db_err) => ServiceError::from_db_err(db_err),
            sea_orm::TransactionError::Transaction(service_err) => service_err,
        }
    }
}

pub trait IntoDbErr {
    fn into_db_err(self) -> DbErr;
}

impl IntoDbErr for DbErr {
    fn into_db_err(self) -> DbErr {
        self
    }
}

impl IntoDbErr for String {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self)
    }
}

impl IntoDbErr for &str {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self.to_string())
    }
}

impl ServiceError {
    /// Generic constructor that normalizes any supported database error input.
    pub fn db_error<E: IntoDbErr>(error: E) -> Self {
        ServiceError::from_db_err(error.into_db_err())
    }

    /// Classifies a `DbErr` before wrapping it: lock and serialization
    /// failures become `ConcurrencyConflict` so callers can retry, everything
    /// else stays a `DatabaseError`.
    pub fn from_db_err(err: DbErr) -> Self {
        let text = err.to_string();
        let lowered = text.to_lowercase();
        if lowered.contains("deadlock")
            || lowered.contains("could not serialize")
            || lowered.contains("serialization failure")
            || lowered.contains("database is locked")
        {
            ServiceError::ConcurrencyConflict(text)
        } else {
            ServiceError::DatabaseError(err)
        }
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidTransition(_) | Self::ConcurrencyConflict(_) => StatusCode::CONFLICT,
            Self::InsufficientStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::OperationTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::EventError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::EventError(_) | Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Structured detail payload for variants that carry more than a message.
    fn response_details(&self) -> Option<String> {
        match self {
            Self::InsufficientStock {
                component_id,
                available,
                requested,
            } => Some(
                json!({
                    "component_id": component_id,
                    "available": available,
                    "requested": requested,
                })
                .to_string(),
            ),
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            details: self.response_details(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
