//! # Rate Feed Error Types
//!
//! A feed error never reaches the dashboard as a failure: the service logs
//! it at `warn` and the converter keeps its defaults for the affected keys.

use thiserror::Error;

/// Rate feed errors.
#[derive(Debug, Error)]
pub enum RatesError {
    /// The request never got an answer (offline, timeout).
    #[error("Rate feed request failed: {0}")]
    Request(String),

    /// The feed answered with a non-success status.
    #[error("Rate feed returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The body did not have the expected shape.
    #[error("Could not decode rate feed response: {0}")]
    Decode(String),

    /// The answer was well formed but carried no usable quote.
    ///
    /// ## When This Occurs
    /// - Empty `conversion_rates` map
    /// - No peer-market advert for the fiat
    /// - Quote not above the fixed deduction
    #[error("No usable quote: {0}")]
    MissingQuote(String),

    /// A configured feed URL is unusable.
    #[error("Invalid rate feed URL: {0}")]
    InvalidUrl(String),
}

impl RatesError {
    /// Passes a success response through; anything else becomes `Status`.
    pub(crate) fn check(response: reqwest::Response) -> RatesResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(RatesError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

impl From<reqwest::Error> for RatesError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RatesError::Decode(err.to_string())
        } else {
            RatesError::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for RatesError {
    fn from(err: url::ParseError) -> Self {
        RatesError::InvalidUrl(err.to_string())
    }
}

/// Result type for rate feed operations.
pub type RatesResult<T> = Result<T, RatesError>;
