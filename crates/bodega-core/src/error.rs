//! # Error Types
//!
//! Domain-specific error types for bodega-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bodega-core errors (this file)                                        │
//! │  ├── CoreError        - Ledger, inventory, cart and exchange rules     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bodega-store errors (separate crate)                                  │
//! │  └── StoreError       - Data store request failures                    │
//! │                                                                         │
//! │  bodega-rates errors (separate crate)                                  │
//! │  └── RatesError       - Rate feed failures (always recovered)          │
//! │                                                                         │
//! │  HTTP API errors (in app)                                              │
//! │  └── ApiError         - What the dashboard sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Dashboard              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, balance, available amount)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are caught by the
/// API layer and translated to `{code, message}` responses.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cart operation on a product that isn't in the cart.
    #[error("Product {0} is not in the cart")]
    ProductNotInCart(String),

    /// Checkout or fiado charge attempted with nothing in the cart.
    #[error("The cart is empty")]
    EmptyCart,

    /// Payment (abono) of zero or a negative amount.
    #[error("Payment amount must be greater than zero")]
    PaymentNotPositive,

    /// Payment larger than what the customer owes.
    ///
    /// ## When This Occurs
    /// ```text
    /// Customer balance: $300.00
    ///      │
    ///      ▼
    /// Abono entered: $350
    ///      │
    ///      ▼
    /// PaymentExceedsBalance { balance: $300.00 }
    ///      │
    ///      ▼
    /// UI shows: "Cannot pay more than $300.00"
    /// ```
    #[error("Cannot pay more than {balance}")]
    PaymentExceedsBalance { balance: Money },

    /// Withdrawal of zero or a negative amount.
    #[error("Withdrawal amount must be greater than zero")]
    WithdrawalNotPositive,

    /// Withdrawal larger than the profit still available.
    #[error("Cannot withdraw more than the available profit ({available})")]
    WithdrawalExceedsAvailable { available: Money },

    /// Restocking by packages needs the units-per-package count.
    #[error("Product {0} has no units-per-package to restock with")]
    MissingPackageSize(String),

    /// Rate key that the exchange engine doesn't know.
    #[error("Unknown rate key: {0}")]
    UnknownRateKey(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
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
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err = CoreError::PaymentExceedsBalance {
            balance: Money::new(dec!(300)),
        };
        assert_eq!(err.to_string(), "Cannot pay more than $300.00");

        let err = CoreError::ProductNotInCart("7".to_string());
        assert_eq!(err.to_string(), "Product 7 is not in the cart");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
