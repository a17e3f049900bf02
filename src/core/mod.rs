//! Core business logic: rates, conversion, preferences and session state

pub mod config;
pub mod converter;
pub mod currency;
pub mod debounce;
pub mod error;
pub mod format;
pub mod log;
pub mod preferences;
pub mod rate_store;
pub mod rates;
pub mod session;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export main types for cleaner imports
pub use converter::{convert, rate_between};
pub use currency::{CurrencySet, RateProvider, RateRecord};
pub use error::{FetchError, LookupError};
pub use rate_store::{RateEvent, RateStore, RefreshOutcome, RefreshStatus};
pub use rates::{RateEntry, RateTable};
