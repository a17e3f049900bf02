//! Converter session: the selected currencies and amount, and what to show
//! for them given the current rate table.

use anyhow::{Result, bail};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::core::config::AppConfig;
use crate::core::converter::{convert, rate_between};
use crate::core::currency::CurrencySet;
use crate::core::error::LookupError;
use crate::core::format::{
    format_result, format_with_commas, parse_amount, parse_formatted_number,
    sanitize_amount_input,
};
use crate::core::preferences::PreferenceStore;
use crate::core::rate_store::{RateStore, RefreshStatus};
use crate::core::rates::RateTable;

const DEFAULT_AMOUNT: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Amount as typed, possibly with separators or stray characters.
    Amount(String),
    From(String),
    To(String),
    Swap,
    Clear,
    Submit,
}

/// When the host should recompute the view after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recompute {
    Debounced,
    Immediate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// No rates fetched yet.
    AwaitingRates,
    Value { amount: f64, formatted: String },
    Error(LookupError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub from: String,
    pub to: String,
    pub amount_text: String,
    pub conversion: Conversion,
    /// e.g. `1 USD = 12,850 UZS`
    pub rate_line: Option<String>,
    pub status: Option<StatusLine>,
    pub loading: bool,
    pub clear_visible: bool,
}

/// Last-updated line, or the failure notice when the latest refresh failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    RatesDate(String),
    RefreshFailed,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::RatesDate(date) => write!(f, "Central Bank rate: {date}"),
            StatusLine::RefreshFailed => write!(f, "Failed to load exchange rates"),
        }
    }
}

impl View {
    /// No rates loaded and no failed attempt yet. After a failure only the
    /// schedule or an explicit refresh fetches again.
    pub fn needs_rates(&self) -> bool {
        self.conversion == Conversion::AwaitingRates
            && self.status != Some(StatusLine::RefreshFailed)
    }
}

pub struct Session {
    store: Arc<RateStore>,
    preferences: PreferenceStore,
    currencies: CurrencySet,
    from: String,
    to: String,
    raw_amount: String,
    last_result: Option<String>,
}

impl Session {
    /// Starts a session from the stored preferences, falling back to the
    /// configured defaults.
    pub fn new(store: Arc<RateStore>, preferences: PreferenceStore, config: &AppConfig) -> Self {
        let restored = preferences.restore(&config.currencies);
        debug!(?restored, "Restored preferences");

        Self {
            store,
            preferences,
            currencies: config.currencies.clone(),
            from: restored
                .from_currency
                .unwrap_or_else(|| config.default_from.clone()),
            to: restored
                .to_currency
                .unwrap_or_else(|| config.default_to.clone()),
            raw_amount: restored
                .last_amount_raw
                .map(|raw| sanitize_amount_input(&raw))
                .unwrap_or_else(|| DEFAULT_AMOUNT.to_string()),
            last_result: None,
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn raw_amount(&self) -> &str {
        &self.raw_amount
    }

    pub fn currencies(&self) -> &CurrencySet {
        &self.currencies
    }

    pub fn store(&self) -> &Arc<RateStore> {
        &self.store
    }

    fn selectable(&self, code: &str) -> Result<String> {
        let code = code.trim().to_uppercase();
        if !self.currencies.contains(&code) {
            bail!("Unsupported currency: {code}");
        }
        Ok(code)
    }

    /// Applies one user input and persists the affected preferences.
    pub fn apply(&mut self, input: Input) -> Result<Recompute> {
        debug!(?input, "Applying input");
        match input {
            Input::Amount(text) => {
                self.raw_amount = sanitize_amount_input(&parse_formatted_number(&text));
                self.preferences.save_amount(&self.raw_amount);
                Ok(Recompute::Debounced)
            }
            Input::From(code) => {
                self.from = self.selectable(&code)?;
                self.preferences.save_currencies(&self.from, &self.to);
                Ok(Recompute::Immediate)
            }
            Input::To(code) => {
                self.to = self.selectable(&code)?;
                self.preferences.save_currencies(&self.from, &self.to);
                Ok(Recompute::Immediate)
            }
            Input::Swap => {
                std::mem::swap(&mut self.from, &mut self.to);
                if let Some(result) = self.last_result.take() {
                    self.raw_amount = parse_formatted_number(&result);
                }
                self.preferences.save_currencies(&self.from, &self.to);
                self.preferences.save_amount(&self.raw_amount);
                Ok(Recompute::Immediate)
            }
            Input::Clear => {
                self.raw_amount.clear();
                self.preferences.save_amount(&self.raw_amount);
                Ok(Recompute::Immediate)
            }
            Input::Submit => Ok(Recompute::Immediate),
        }
    }

    /// Recomputes the conversion against the current rate table.
    pub fn render(&mut self) -> View {
        let table = self.store.table();
        let status = self.store.status();
        let amount = parse_amount(&self.raw_amount);

        let conversion = if table.is_empty() {
            Conversion::AwaitingRates
        } else {
            match convert(amount, &self.from, &self.to, &table) {
                Ok(value) => Conversion::Value {
                    amount: value,
                    formatted: format_result(value, &self.to),
                },
                Err(e) => Conversion::Error(e),
            }
        };
        self.last_result = match &conversion {
            Conversion::Value { formatted, .. } => Some(formatted.clone()),
            _ => None,
        };

        let rate_line = match &conversion {
            Conversion::Value { .. } => rate_between(&self.from, &self.to, &table)
                .ok()
                .map(|rate| {
                    format!(
                        "1 {} = {} {}",
                        self.from,
                        format_result(rate, &self.to),
                        self.to
                    )
                }),
            _ => None,
        };

        View {
            from: self.from.clone(),
            to: self.to.clone(),
            amount_text: format_with_commas(&self.raw_amount),
            conversion,
            rate_line,
            status: status_line(&table, &status),
            loading: self.store.is_loading(),
            clear_visible: !self.raw_amount.is_empty() && amount > 0.0,
        }
    }
}

pub fn status_line(table: &RateTable, status: &RefreshStatus) -> Option<StatusLine> {
    if status.last_error.is_some() {
        return Some(StatusLine::RefreshFailed);
    }
    table
        .source_date()
        .map(|date| StatusLine::RatesDate(date.to_string()))
}
