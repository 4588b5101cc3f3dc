//! # Error Types
//!
//! Domain-specific error types for kade-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kade-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kade-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  kade-app errors                                                       │
//! │  └── AppError         - What the UI boundary sees                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → AppError → toast/alert  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business-rule violations are handled locally with a user-visible,
//! non-blocking notice; storage failures surface as generic faults.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was attempted with nothing in the cart. Surfaced as a
    /// transient notice; no state change.
    #[error("Cart is empty")]
    EmptyCart,

    /// Adding the item would exceed the on-hand quantity observed when it
    /// was offered for sale. The cart is left unchanged.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Cash tendered is less than the total and the operator has not yet
    /// confirmed a partial-payment/credit sale. The caller re-issues the
    /// checkout with the confirmation flag set to proceed.
    #[error("Cash given ({cash_given}) is less than total ({total}); confirmation required for a credit sale")]
    ShortPaymentNeedsConfirmation {
        total: crate::Money,
        cash_given: crate::Money,
    },

    /// Inventory unit referenced by a cart line no longer exists.
    #[error("Inventory unit not found: {0}")]
    InventoryNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (bad characters, bad UUID, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. duplicate username).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Money;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "TS1".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for TS1: available 3, requested 5"
        );
    }

    #[test]
    fn test_short_payment_message() {
        let err = CoreError::ShortPaymentNeedsConfirmation {
            total: Money::from_cents(100000),
            cash_given: Money::from_cents(50000),
        };
        assert!(err.to_string().contains("Rs. 500.00"));
        assert!(err.to_string().contains("Rs. 1000.00"));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
