//! # Error Types
//!
//! Domain-specific error types for opsdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  opsdesk-core errors (this file)                                       │
//! │  ├── CoreError        - Ledger rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  opsdesk-db errors (separate crate)                                    │
//! │  └── DbError          - Store operation failures                       │
//! │                                                                         │
//! │  Console errors (in app)                                               │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError                          │
//! │                          DbError   ──┘                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors are raised before any store call, so a rejected form
//! never leaves partial state behind.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Ledger rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id does not exist in the inventory.
    ///
    /// ## When This Occurs
    /// - An order references a product deleted in the meantime
    /// - A restock edit targets a removed product
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order id does not exist in the order ledger.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Amount is unusable for the requested operation.
    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Magnitude exceeds what the ledger stores.
    #[error("{field} must be between -{max} and {max}")]
    OutOfRange { field: String, max: i64 },

    /// Invalid format (e.g., invalid UUID, invalid phone).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound("p-1".to_string());
        assert_eq!(err.to_string(), "Product not found: p-1");

        let err = CoreError::InvalidAmount {
            reason: "amount must be positive".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid amount: amount must be positive");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("phone").to_string(),
            "phone is required"
        );

        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        };
        assert_eq!(err.to_string(), "name must be at most 200 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("customer_name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
