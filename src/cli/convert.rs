use anyhow::Result;
use tracing::info;

use super::conversion::{ConversionOverrides, ConversionView};
use super::ui;
use crate::core::RateCoordinator;
use crate::core::config::AppConfig;

/// Fetches the rate once and prints the conversion.
pub async fn run(
    config: &AppConfig,
    coordinator: &RateCoordinator,
    overrides: &ConversionOverrides,
) -> Result<ConversionView> {
    let mut view = ConversionView::new(config, overrides);
    info!(from = %view.from, to = %view.to, amount = view.amount, "Converting");

    let spinner = ui::new_spinner("Fetching exchange rate...")?;
    let result = coordinator.refresh(&view.from, &view.to).await;
    spinner.finish_and_clear();

    if let Some(result) = result {
        view.apply_rate(result);
    }

    println!("{}", view.render());
    Ok(view)
}
