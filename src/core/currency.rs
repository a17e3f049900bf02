//! Rate source abstraction and the supported currency list

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::FetchError;
use crate::core::rates::RateEntry;

/// One currency quote as decoded from the rate source.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    pub code: String,
    pub entry: RateEntry,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the full list of current quotes.
    async fn fetch_rates(&self) -> Result<Vec<RateRecord>, FetchError>;
}

/// Currency codes offered for selection, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencySet(Vec<String>);

impl CurrencySet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: Vec<String> = Vec::new();
        for code in codes {
            let code = code.into().trim().to_uppercase();
            if !code.is_empty() && !set.contains(&code) {
                set.push(code);
            }
        }
        Self(set)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CurrencySet {
    fn default() -> Self {
        Self::new([
            "UZS", "USD", "EUR", "RUB", "GBP", "CHF", "JPY", "CNY", "KRW", "KZT", "KGS", "TJS",
            "TRY", "AED",
        ])
    }
}
