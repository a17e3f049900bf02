//! Rate table types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::currency::RateRecord;

/// `nominal` units of a currency cost `rate` units of the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub rate: f64,
    pub nominal: u32,
    pub name: String,
    pub date: String,
    /// Day-over-day change of `rate`, when the source reports it.
    pub diff: Option<f64>,
}

impl RateEntry {
    /// Price of exactly one unit in base-currency terms.
    pub fn per_unit(&self) -> f64 {
        self.rate / f64::from(self.nominal)
    }
}

/// Latest rates keyed by currency code, all expressed against `base`.
///
/// Built in one go from a successful fetch and never mutated afterwards;
/// the store swaps in a new table instead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateTable {
    base: String,
    entries: BTreeMap<String, RateEntry>,
    source_date: Option<String>,
}

impl RateTable {
    pub fn empty(base: &str) -> Self {
        Self {
            base: base.to_string(),
            entries: BTreeMap::new(),
            source_date: None,
        }
    }

    /// Builds a table from fetched records, pinning the base currency at
    /// rate 1, nominal 1. The source date is taken from the first record.
    pub fn from_records(base: &str, records: Vec<RateRecord>) -> Self {
        let source_date = records.first().map(|r| r.entry.date.clone());

        let mut entries = BTreeMap::new();
        entries.insert(
            base.to_string(),
            RateEntry {
                rate: 1.0,
                nominal: 1,
                name: base.to_string(),
                date: source_date.clone().unwrap_or_default(),
                diff: None,
            },
        );
        for record in records {
            if record.code == base {
                continue;
            }
            entries.insert(record.code, record.entry);
        }

        Self {
            base: base.to_string(),
            entries,
            source_date,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn get(&self, code: &str) -> Option<&RateEntry> {
        self.entries.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Date the source published these rates for.
    pub fn source_date(&self) -> Option<&str> {
        self.source_date.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RateEntry)> {
        self.entries.iter()
    }
}
