//! Domain errors for rate refresh and currency lookup.

use thiserror::Error;

/// Failure while refreshing the rate table from the remote source.
///
/// Carries rendered messages rather than the underlying transport errors so
/// the last failure can be kept in the store status and broadcast to
/// listeners.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Request(String),
    #[error("HTTP error: {0}")]
    Status(String),
    #[error("Malformed rate response: {0}")]
    Malformed(String),
}

/// A conversion was requested for a currency absent from the rate table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No exchange rate available for currency: {code}")]
pub struct LookupError {
    pub code: String,
}

impl LookupError {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
