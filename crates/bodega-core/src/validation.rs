//! # Validation Module
//!
//! Input validation utilities for Bodega POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard forms                                              │
//! │  ├── Character filters on number fields                                │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP command (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field rules                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger / inventory rules                                     │
//! │  └── Balance and available-profit checks (CoreError)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bodega_core::validation::{validate_product_name, validate_search_query};
//!
//! validate_product_name("Harina PAN 1kg").unwrap();
//! assert_eq!(validate_search_query("  arroz ").unwrap(), "arroz");
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_NAME_LEN, MAX_QUERY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_NAME_LEN`] characters
///
/// ## Example
/// ```rust
/// use bodega_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Queso llanero").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a customer name. Same rules as a product name.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns everything)
/// - At most [`MAX_QUERY_LEN`] characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Rejects zero and negative amounts.
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a 1-based page number from a query string.
pub fn validate_page(page: i64) -> ValidationResult<usize> {
    if page < 1 {
        return Err(ValidationError::OutOfRange {
            field: "page".to_string(),
            min: 1,
            max: i64::MAX,
        });
    }

    usize::try_from(page).map_err(|_| ValidationError::InvalidFormat {
        field: "page".to_string(),
        reason: "too large".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Harina PAN").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("María José").is_ok());
        assert!(matches!(
            validate_customer_name("  "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  pan ").unwrap(), "pan");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount("amount", Money::from_int(1)).is_ok());
        assert!(validate_positive_amount("amount", Money::zero()).is_err());
        assert!(validate_positive_amount("amount", Money::from_int(-3)).is_err());
    }

    #[test]
    fn test_validate_page() {
        assert_eq!(validate_page(1).unwrap(), 1);
        assert!(validate_page(0).is_err());
        assert!(validate_page(-2).is_err());
    }
}
