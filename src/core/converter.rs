//! Conversion arithmetic over a rate table.
//!
//! Every rate is quoted against the table's base currency, so a cross
//! conversion goes through the base: `amount * per_unit(from) / per_unit(to)`.
//! Results are not rounded here; see [`crate::core::format`].

use crate::core::error::LookupError;
use crate::core::rates::{RateEntry, RateTable};

fn lookup<'a>(table: &'a RateTable, code: &str) -> Result<&'a RateEntry, LookupError> {
    table.get(code).ok_or_else(|| LookupError::new(code))
}

/// Converts `amount` of `from` into `to`.
pub fn convert(amount: f64, from: &str, to: &str, table: &RateTable) -> Result<f64, LookupError> {
    let from_rate = lookup(table, from)?;
    let to_rate = lookup(table, to)?;

    if from == to {
        return Ok(amount);
    }

    let result = if from == table.base() {
        amount / to_rate.per_unit()
    } else if to == table.base() {
        amount * from_rate.per_unit()
    } else {
        amount * from_rate.per_unit() / to_rate.per_unit()
    };
    Ok(result)
}

/// Price of one unit of `from` expressed in `to`.
pub fn rate_between(from: &str, to: &str, table: &RateTable) -> Result<f64, LookupError> {
    convert(1.0, from, to, table)
}
