use super::ui;
use crate::core::{ConversionProvider, Converter, Currency};
use anyhow::Result;
use std::sync::Arc;

/// Converts once and prints the card. A failed request still prints the card, then errors.
pub async fn run(
    provider: Arc<dyn ConversionProvider>,
    amount: &str,
    from: Currency,
    to: Currency,
) -> Result<()> {
    let mut converter = Converter::new(provider, from, to);
    converter.set_amount(amount);

    let settled = if converter.state().is_loading() {
        let pb = ui::new_spinner(&converter.view().to_string());
        let settled = converter.settle().await;
        pb.finish_and_clear();
        settled
    } else {
        Ok(())
    };

    println!("{}", ui::render_card(converter.state()));
    Ok(settled?)
}
