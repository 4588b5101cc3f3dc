//! # App Error Type
//!
//! Unified error type for the command surface.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in KadePOS                                │
//! │                                                                         │
//! │  CoreError ──┐                                                          │
//! │              ├──► AppError { code, message } ──► UI boundary            │
//! │  DbError ────┘                                                          │
//! │                                                                         │
//! │  Business-rule violations keep a specific code so the UI can react      │
//! │  (confirmation dialog, stock notice); storage faults collapse to a      │
//! │  generic DATABASE_ERROR with the detail logged, not displayed.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use kade_core::CoreError;
use kade_db::DbError;

/// Error returned from app-layer commands.
///
/// ## Serialization
/// This is what the UI receives when a command fails:
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for TS1: available 3, requested 5"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for app responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Business logic error
    BusinessLogic,

    /// Internal error
    Internal,

    /// Cart operation failed (e.g. checkout on empty cart)
    CartError,

    /// Insufficient stock
    InsufficientStock,

    /// Wrong username or password
    InvalidCredentials,

    /// Caller's session lacks the required role, or nobody is logged in
    Unauthorized,

    /// Destructive or unusual operation needs an explicit confirmation
    /// flag before it runs (delete item, reset data, short payment)
    ConfirmationRequired,

    /// The backup file could not be parsed; nothing was changed
    InvalidBackup,
}

impl AppError {
    /// Creates a new app error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates a confirmation-required error.
    pub fn needs_confirmation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfirmationRequired, message)
    }

    /// Creates an invalid-credentials error. Deliberately does not say
    /// whether the username or the password was wrong.
    pub fn invalid_credentials() -> Self {
        AppError::new(ErrorCode::InvalidCredentials, "Invalid username or password")
    }
}

/// Converts database errors to app errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => AppError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::InsufficientStock { sku, requested } => AppError::new(
                ErrorCode::InsufficientStock,
                format!("Insufficient stock for {}: requested {}", sku, requested),
            ),
            DbError::InvalidBackup(e) => {
                AppError::new(ErrorCode::InvalidBackup, format!("Invalid backup file: {}", e))
            }
            DbError::BackupIo(e) => {
                tracing::error!("Backup I/O failed: {}", e);
                AppError::new(ErrorCode::Internal, "Backup file operation failed")
            }
            DbError::ConnectionFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                AppError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => AppError::new(ErrorCode::CartError, "Cart is empty"),
            CoreError::InsufficientStock {
                sku,
                available,
                requested,
            } => AppError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    sku, available, requested
                ),
            ),
            CoreError::ShortPaymentNeedsConfirmation { total, cash_given } => AppError::new(
                ErrorCode::ConfirmationRequired,
                format!(
                    "Cash given ({}) is less than total ({}). Record as credit sale?",
                    cash_given, total
                ),
            ),
            CoreError::InventoryNotFound(id) => AppError::not_found("Inventory unit", &id),
            CoreError::Validation(e) => AppError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Result type for app-layer commands.
pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kade_core::Money;

    #[test]
    fn test_short_payment_maps_to_confirmation_required() {
        let err: AppError = CoreError::ShortPaymentNeedsConfirmation {
            total: Money::from_cents(100000),
            cash_given: Money::from_cents(50000),
        }
        .into();

        assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        assert!(err.message.contains("credit sale"));
    }

    #[test]
    fn test_db_query_failure_is_generic_to_ui() {
        let err: AppError = DbError::QueryFailed("secret table detail".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("secret"));
    }

    #[test]
    fn test_serializes_with_screaming_snake_code() {
        let err = AppError::invalid_credentials();
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"INVALID_CREDENTIALS\""));
    }
}
