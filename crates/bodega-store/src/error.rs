//! # Store Error Types
//!
//! Error types for data store requests.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  HTTP failure (reqwest::Error / non-2xx status)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds entity context                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in bodega-api) ← "error loading" / "error saving" + 502     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Dashboard shows a generic message; the detail stays in the log       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Data store request errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found in the store.
    ///
    /// ## When This Occurs
    /// - `GET /{collection}/{id}` answers 404
    /// - The record was deleted by another client
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The request never got an answer.
    ///
    /// ## When This Occurs
    /// - Store is not running
    /// - Timeout elapsed
    /// - Connection reset
    #[error("Store request failed: {0}")]
    Request(String),

    /// The store answered with a non-success status.
    #[error("Store returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The body did not match the expected record shape.
    #[error("Could not decode store response: {0}")]
    Decode(String),

    /// The configured base URL cannot address collections.
    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether the failure is a missing record rather than a broken store.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Convert reqwest errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// decode error       → StoreError::Decode
/// status error       → StoreError::Status
/// anything else      → StoreError::Request
/// ```
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return StoreError::Decode(err.to_string());
        }

        match (err.status(), err.url()) {
            (Some(status), Some(url)) => StoreError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            },
            _ => StoreError::Request(err.to_string()),
        }
    }
}

impl From<url::ParseError> for StoreError {
    fn from(err: url::ParseError) -> Self {
        StoreError::InvalidUrl(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
