//! # Validation Module
//!
//! Input checks for the order, inventory and cash forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console command                                              │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: required fields, lengths, positive amounts           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK constraints on enum columns                                 │
//! │                                                                         │
//! │  Every check here runs before the first store call.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are not sign-checked: the inventory screen accepts negative and
//! zero prices, and so does the ledger. Their magnitude is bounded so that
//! one mistyped row cannot push dashboard totals past `i64`.
//!
//! ## Usage
//! ```rust
//! use opsdesk_core::validation::{validate_phone, validate_required};
//!
//! assert_eq!(validate_required("customer_name", "  Rahim ").unwrap(), "Rahim");
//! assert!(validate_phone("01712-345678").is_ok());
//! assert!(validate_phone("   ").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of names and titles.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of addresses and notes.
pub const MAX_TEXT_LEN: usize = 1000;

/// Maximum length of a phone number as typed.
pub const MAX_PHONE_LEN: usize = 32;

/// Largest price or amount in minor units (1,000,000,000.00).
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

/// Largest stock count, positive or negative.
pub const MAX_STOCK: i64 = 1_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Checks that a field is non-blank and returns it trimmed.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value.to_string())
}

/// Checks a length limit and returns the value trimmed.
pub fn validate_max_len(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(value.to_string())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use opsdesk_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Vegetable Cutter").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = validate_required("name", name)?;
    validate_max_len("name", &name, MAX_NAME_LEN)
}

/// Validates a customer name.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = validate_required("customer_name", name)?;
    validate_max_len("customer_name", &name, MAX_NAME_LEN)
}

/// Validates a customer phone number as typed.
///
/// ## Rules
/// - Must not be blank
/// - At most 32 characters
/// - Must contain at least one digit
///
/// Separators and a leading `+` are kept; links normalise them later.
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = validate_required("phone", phone)?;
    let phone = validate_max_len("phone", &phone, MAX_PHONE_LEN)?;

    if !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain digits".to_string(),
        });
    }

    Ok(phone)
}

/// Validates free text (address, note). Blank is allowed.
pub fn validate_text(field: &str, value: &str) -> ValidationResult<String> {
    validate_max_len(field, value, MAX_TEXT_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an expense or cash amount in minor units.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ## Example
/// ```rust
/// use opsdesk_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents("amount", 50_000).is_ok());
/// assert!(validate_amount_cents("amount", 0).is_err());
/// ```
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    validate_price_cents(field, cents).map(|_| ())
}

/// Validates a price in minor units. Zero and negative prices pass.
///
/// ## Example
/// ```rust
/// use opsdesk_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("buy_price", -500).is_ok());
/// assert!(validate_price_cents("buy_price", i64::MAX).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<i64> {
    within(field, cents, MAX_AMOUNT_CENTS)
}

/// Validates a stock count. Negative stock (oversold) passes.
pub fn validate_stock(stock: i64) -> ValidationResult<i64> {
    within("stock", stock, MAX_STOCK)
}

fn within(field: &str, value: i64, max: i64) -> ValidationResult<i64> {
    if value.checked_abs().map_or(true, |v| v > max) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            max,
        });
    }
    Ok(value)
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use opsdesk_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
