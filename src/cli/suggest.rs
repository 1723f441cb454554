use super::ui;
use crate::core::suggest::suggested_tickers;
use comfy_table::{Cell, Table};

pub fn suggestions_table() -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Ticker"), ui::header_cell("Profile")]);
    for suggestion in suggested_tickers() {
        table.add_row(vec![
            Cell::new(suggestion.ticker),
            Cell::new(suggestion.description),
        ]);
    }
    table
}

pub fn run() {
    println!(
        "{}",
        ui::style_text(
            "You did not enter any stock ticker. Here are some popular ones:",
            ui::StyleType::Subtle
        )
    );
    println!("{}", suggestions_table());
}
