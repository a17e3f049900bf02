use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::core::session::{Conversion, StatusLine, View};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Highlight,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Highlight => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned numeric cell.
pub fn number_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Creates a cell for a day-over-day change with color coding. `None` is
/// displayed as "N/A".
pub fn change_cell(change: Option<f64>) -> Cell {
    match change {
        None => Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        Some(change) => {
            let color = if change >= 0.0 { Color::Green } else { Color::Red };
            Cell::new(format!("{change:+.2}"))
                .fg(color)
                .set_alignment(CellAlignment::Right)
        }
    }
}

/// Creates the loading indicator shown while rates are fetched.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Prints the conversion result, the rate summary and the status line.
pub fn print_view(view: &View) {
    let amount = if view.amount_text.is_empty() {
        "0"
    } else {
        view.amount_text.as_str()
    };

    match &view.conversion {
        Conversion::AwaitingRates => {
            println!(
                "{}",
                style_text("Waiting for exchange rates...", StyleType::Subtle)
            );
        }
        Conversion::Value { formatted, .. } => {
            println!(
                "{} {} = {} {}",
                amount,
                view.from,
                style_text(formatted, StyleType::Highlight),
                view.to
            );
        }
        Conversion::Error(e) => {
            println!("{}", style_text(&format!("⚠ {e}"), StyleType::Error));
        }
    }

    if let Some(rate_line) = &view.rate_line {
        println!("{rate_line}");
    }
    match &view.status {
        Some(status @ StatusLine::RefreshFailed) => {
            println!("{}", style_text(&format!("⚠ {status}"), StyleType::Error))
        }
        Some(status) => println!("{}", style_text(&status.to_string(), StyleType::Subtle)),
        None => {}
    }
}
