//! # API Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in opsdesk                                │
//! │                                                                         │
//! │  Command Function  ──  Result<T, ApiError>                              │
//! │         │                                                               │
//! │         ├── Screen not allowed? ─── ErrorCode::Forbidden ─────────┐     │
//! │         │                                                         │     │
//! │         ├── Bad form input? ─── ValidationError ──────────────────┤     │
//! │         │                                                         ▼     │
//! │         ├── Store failure? ─── DbError::QueryFailed("...") ──► ApiError │
//! │         │                                                         │     │
//! │         ▼                                                         │     │
//! │  Success                                                          │     │
//! │                                                                   ▼     │
//! │  {"code": "NOT_FOUND", "message": "Product not found: 9b1e..."}         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store internals are logged and replaced by a generic message.

use serde::Serialize;

use opsdesk_core::{CoreError, Screen, ValidationError};
use opsdesk_db::DbError;

/// API error returned from console commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "FORBIDDEN",
///   "message": "Staff cannot open reports"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// No one is logged in (401)
    Unauthenticated,

    /// The session role may not open this screen (403)
    Forbidden,

    /// Database operation failed (500)
    DatabaseError,

    /// Ledger rule rejected the request (422)
    BusinessLogic,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthenticated() -> Self {
        ApiError::new(ErrorCode::Unauthenticated, "Not logged in")
    }

    pub fn forbidden(role: impl std::fmt::Display, screen: Screen) -> Self {
        ApiError::new(
            ErrorCode::Forbidden,
            format!("{} cannot open {:?}", role, screen),
        )
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::Validation(e) => ApiError::from(e),
            DbError::InvalidAmount(reason) => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("Invalid amount: {}", reason),
            ),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::OrderNotFound(id) => ApiError::not_found("Order", &id),
            CoreError::InvalidAmount { reason } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("Invalid amount: {}", reason),
            ),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_through() {
        let err = ApiError::from(DbError::not_found("Order", "o-1"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Order not found: o-1");
    }

    #[test]
    fn test_query_failure_is_generic() {
        let err = ApiError::from(DbError::QueryFailed("no such table: orders".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("orders"));
    }

    #[test]
    fn test_validation_keeps_field() {
        let err = ApiError::from(DbError::Validation(ValidationError::required("phone")));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("phone"));
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::forbidden("staff", Screen::Reports);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "FORBIDDEN");
        assert_eq!(json["message"], "staff cannot open Reports");
    }
}
