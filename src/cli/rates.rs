use super::ui;
use crate::core::format::format_decimal;
use crate::core::rate_store::{RateStore, RefreshOutcome};
use crate::core::rates::RateTable;
use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

/// Fetches the current rates and prints them as a table.
pub async fn run(store: &RateStore) -> Result<()> {
    let spinner = ui::new_spinner("Fetching exchange rates...");
    let outcome = store.refresh().await;
    spinner.finish_and_clear();

    if let RefreshOutcome::Failed(e) = outcome {
        return Err(anyhow::Error::new(e)).context("Could not load exchange rates");
    }

    let table = store.table();
    let title = match table.source_date() {
        Some(date) => format!("Central Bank rates for {date}"),
        None => "Central Bank rates".to_string(),
    };
    println!("\n{}", ui::style_text(&title, ui::StyleType::Title));
    println!("{}", build_table(&table));
    Ok(())
}

pub fn build_table(rates: &RateTable) -> Table {
    let base = rates.base();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Nominal"),
        ui::header_cell(&format!("Rate ({base})")),
        ui::header_cell(&format!("Per unit ({base})")),
        ui::header_cell("Change"),
    ]);

    for (code, entry) in rates.iter() {
        if code == base {
            continue;
        }
        table.add_row(vec![
            Cell::new(code),
            Cell::new(&entry.name),
            ui::number_cell(entry.nominal.to_string()),
            ui::number_cell(format_decimal(entry.rate)),
            ui::number_cell(format_decimal(entry.per_unit())),
            ui::change_cell(entry.diff),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_utils::record;

    #[test]
    fn test_build_table_skips_base() {
        let rates = RateTable::from_records(
            "UZS",
            vec![record("USD", 12850.0, 1), record("JPY", 850.35, 10)],
        );
        let rendered = build_table(&rates).to_string();

        assert!(rendered.contains("USD"));
        assert!(rendered.contains("12,850.00"));
        assert!(rendered.contains("85.035"));
        assert!(!rendered.contains("│ UZS"));
    }
}
