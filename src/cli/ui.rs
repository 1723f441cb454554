use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Error,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Error => style(text).red(),
        StyleType::Warning => style(text).yellow(),
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

pub fn format_amount(value: f64, currency: &str) -> String {
    format!("{value:.2} {currency}")
}

/// Formats a fraction (0.1234) as a percentage (12.34%).
pub fn format_percentage(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

pub fn amount_cell(value: f64, currency: &str) -> Cell {
    Cell::new(format_amount(value, currency)).set_alignment(CellAlignment::Right)
}

/// Formats a cell with bold and green text
pub fn total_cell(value: f64, currency: &str) -> Cell {
    Cell::new(format_amount(value, currency))
        .add_attribute(Attribute::Bold)
        .fg(Color::Green)
        .set_alignment(CellAlignment::Right)
}

/// Creates a cell for a percentage, green when non-negative and red otherwise.
pub fn change_cell(fraction: f64) -> Cell {
    let text = format_percentage(fraction);
    if fraction >= 0.0 {
        Cell::new(text)
            .fg(Color::Green)
            .set_alignment(CellAlignment::Right)
    } else {
        Cell::new(text)
            .fg(Color::Red)
            .set_alignment(CellAlignment::Right)
    }
}

/// Creates a cell for "N/A" values.
pub fn na_cell() -> Cell {
    Cell::new("N/A")
        .fg(Color::DarkGrey)
        .set_alignment(CellAlignment::Right)
}

/// Horizontal bar proportional to `value / max`, at most `width` characters.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * width as f64).round() as usize;
    "█".repeat(len.clamp(1, width))
}

/// Creates a spinner shown while network calls are in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_amount(1234.5678, "INR"), "1234.57 INR");
        assert_eq!(format_percentage(0.123456), "12.35%");
        assert_eq!(format_percentage(-0.05), "-5.00%");
    }

    #[test]
    fn styles_keep_text() {
        for style_type in [
            StyleType::Title,
            StyleType::Error,
            StyleType::Warning,
            StyleType::Subtle,
        ] {
            assert!(style_text("heads up", style_type).contains("heads up"));
        }
    }

    #[test]
    fn bar_scales_to_width() {
        assert_eq!(bar(50.0, 100.0, 10).chars().count(), 5);
        assert_eq!(bar(100.0, 100.0, 10).chars().count(), 10);
        assert_eq!(bar(0.1, 100.0, 10).chars().count(), 1);
        assert!(bar(10.0, 0.0, 10).is_empty());
    }
}
