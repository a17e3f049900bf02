//! Shared fixtures for unit tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::{FetchError, RateEntry, RateProvider, RateRecord};

pub(crate) fn record(code: &str, rate: f64, nominal: u32) -> RateRecord {
    RateRecord {
        code: code.to_string(),
        entry: RateEntry {
            rate,
            nominal,
            name: code.to_string(),
            date: "19.10.2026".to_string(),
            diff: None,
        },
    }
}

/// Serves a fixed set of records, or a failure once `fail` is set, and
/// counts the fetches.
pub(crate) struct StaticProvider {
    records: Vec<RateRecord>,
    failure: Mutex<Option<FetchError>>,
    calls: AtomicUsize,
}

impl StaticProvider {
    pub(crate) fn new(records: Vec<RateRecord>) -> Self {
        Self {
            records,
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fail(&self, error: FetchError) {
        *self.failure.lock().unwrap() = Some(error);
    }
}

#[async_trait]
impl RateProvider for StaticProvider {
    async fn fetch_rates(&self) -> Result<Vec<RateRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.records.clone())
    }
}
