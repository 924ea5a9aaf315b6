//! # API Error Type
//!
//! Unified error type for the dashboard commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Bodega POS                             │
//! │                                                                         │
//! │  Dashboard                   Rust Backend                               │
//! │  ─────────                   ────────────                               │
//! │                                                                         │
//! │  POST /customers/7/payments                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<Json<T>, ApiError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error? ─── StoreError::Request("...") ──────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Rule broken? ─── CoreError::PaymentExceeds… ──── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄── 422 { "code": "PAYMENT_ERROR",                                    │
//! │            "message": "Cannot pay more than $300.00" }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store failures never leak URLs or transport detail to the dashboard: the
//! detail is logged and a generic message goes out with a 502.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bodega_core::{CoreError, ValidationError};
use bodega_store::StoreError;
use serde::Serialize;
use ts_rs::TS;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Customer not found: 3f2a…"
/// }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Business rule refused the operation (422)
    BusinessLogic,

    /// Payment (abono) refused (422)
    PaymentError,

    /// Cart operation failed (409)
    CartError,

    /// The data store could not be read or written (502)
    StoreError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::BusinessLogic | ErrorCode::PaymentError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::CartError => StatusCode::CONFLICT,
            ErrorCode::StoreError => StatusCode::BAD_GATEWAY,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
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
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::InvalidUrl(url) => {
                tracing::error!(url = %url, "Store URL is invalid");
                ApiError::internal("Data store is misconfigured")
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, "Store request failed");
                ApiError::new(ErrorCode::StoreError, "Could not reach the data store")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            e @ (CoreError::ProductNotInCart(_) | CoreError::EmptyCart) => {
                ApiError::cart(e.to_string())
            }
            e @ (CoreError::PaymentNotPositive | CoreError::PaymentExceedsBalance { .. }) => {
                ApiError::new(ErrorCode::PaymentError, e.to_string())
            }
            e @ (CoreError::WithdrawalNotPositive
            | CoreError::WithdrawalExceedsAvailable { .. }
            | CoreError::MissingPackageSize(_)) => {
                ApiError::new(ErrorCode::BusinessLogic, e.to_string())
            }
            e @ CoreError::UnknownRateKey(_) => ApiError::validation(e.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_core::Money;

    #[test]
    fn test_store_failure_is_generic() {
        let err = ApiError::from(StoreError::Request("connection refused 10.0.0.5".into()));
        assert_eq!(err.code, ErrorCode::StoreError);
        assert!(!err.message.contains("10.0.0.5"));
        assert_eq!(err.code.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_store_not_found() {
        let err = ApiError::from(StoreError::not_found("Customer", "abc"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Customer not found: abc");
    }

    #[test]
    fn test_core_error_codes() {
        let err = ApiError::from(CoreError::PaymentExceedsBalance {
            balance: Money::from_int(300),
        });
        assert_eq!(err.code, ErrorCode::PaymentError);
        assert_eq!(err.message, "Cannot pay more than $300.00");

        let err = ApiError::from(CoreError::EmptyCart);
        assert_eq!(err.code.status(), StatusCode::CONFLICT);

        let err = ApiError::from(CoreError::WithdrawalNotPositive);
        assert_eq!(err.code.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = ApiError::from(CoreError::Validation(ValidationError::Required {
            field: "name".into(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "name is required");
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::not_found("Product", "7");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: 7");
        assert_eq!(err.to_string(), "[NotFound] Product not found: 7");
    }
}
