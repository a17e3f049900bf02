//! Persisted user preferences: last selected currencies and amount.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::currency::CurrencySet;
use crate::store::KeyValueCollection;

pub const FROM_CURRENCY_KEY: &str = "pullarim_from_currency";
pub const TO_CURRENCY_KEY: &str = "pullarim_to_currency";
pub const LAST_AMOUNT_KEY: &str = "pullarim_last_amount";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
    pub last_amount_raw: Option<String>,
}

pub struct PreferenceStore {
    collection: Arc<dyn KeyValueCollection>,
}

impl PreferenceStore {
    pub fn new(collection: Arc<dyn KeyValueCollection>) -> Self {
        Self { collection }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.collection.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read preference {key}: {e}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.collection.set(key, value) {
            warn!("Failed to save preference {key}: {e}");
        }
    }

    fn read_non_empty(&self, key: &str) -> Option<String> {
        self.read(key).filter(|value| !value.is_empty())
    }

    /// Reads the stored values. Empty values count as unset.
    pub fn load(&self) -> Preferences {
        Preferences {
            from_currency: self.read_non_empty(FROM_CURRENCY_KEY),
            to_currency: self.read_non_empty(TO_CURRENCY_KEY),
            last_amount_raw: self.read_non_empty(LAST_AMOUNT_KEY),
        }
    }

    /// Reads the stored values, dropping currency codes that are no longer
    /// selectable.
    pub fn restore(&self, supported: &CurrencySet) -> Preferences {
        let mut prefs = self.load();
        for slot in [&mut prefs.from_currency, &mut prefs.to_currency] {
            if let Some(code) = slot.as_deref() {
                if !supported.contains(code) {
                    debug!("Ignoring stored currency {code}: not in the supported set");
                    *slot = None;
                }
            }
        }
        prefs
    }

    pub fn save_currencies(&self, from: &str, to: &str) {
        self.write(FROM_CURRENCY_KEY, from);
        self.write(TO_CURRENCY_KEY, to);
    }

    /// Stores the raw amount; an empty amount removes the stored one.
    pub fn save_amount(&self, raw: &str) {
        if !raw.is_empty() {
            self.write(LAST_AMOUNT_KEY, raw);
        } else if let Err(e) = self.collection.remove(LAST_AMOUNT_KEY) {
            warn!("Failed to clear preference {LAST_AMOUNT_KEY}: {e}");
        }
    }
}
