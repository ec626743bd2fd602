use crate::core::state::{InputState, OutputView};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Result,
    Loading,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Loading => style(text).yellow(),
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

/// Renders the output region: a loading note, the result, or the placeholder prompt.
pub fn render_output(view: &OutputView) -> String {
    let text = view.to_string();
    match view {
        OutputView::Loading => style_text(&text, StyleType::Loading),
        OutputView::Result { .. } => style_text(&text, StyleType::Result),
        OutputView::Placeholder => style_text(&text, StyleType::Subtle),
    }
}

/// Renders the whole form as a card: the inputs and the output region.
pub fn render_card(state: &InputState) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Amount"),
        header_cell("From"),
        header_cell("To"),
        header_cell("Result"),
    ]);

    let amount = if state.amount().is_empty() {
        Cell::new("-").fg(Color::DarkGrey)
    } else {
        Cell::new(state.amount())
    };
    let result_cell = match state.view() {
        view @ OutputView::Result { .. } => Cell::new(view.to_string())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        view => Cell::new(view.to_string()).fg(Color::DarkGrey),
    };

    table.add_row(vec![
        amount.set_alignment(CellAlignment::Right),
        Cell::new(state.from()),
        Cell::new(state.to()),
        result_cell.set_alignment(CellAlignment::Right),
    ]);

    let mut output = format!(
        "{}\n\n",
        style_text("Currency Converter", StyleType::Title)
    );
    output.push_str(&table.to_string());

    if let Some(date) = state.result().and_then(|r| r.date) {
        output.push_str(&format!(
            "\n{}",
            style_text(&format!("Rates as of {date}"), StyleType::Subtle)
        ));
    }

    output
}

/// Creates a new `indicatif::ProgressBar` spinner shown while a request is outstanding.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
