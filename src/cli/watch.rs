use anyhow::Result;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::conversion::{ConversionOverrides, ConversionView};
use super::ui;
use crate::core::RateCoordinator;
use crate::core::config::AppConfig;

const PROGRESS_TICK: Duration = Duration::from_millis(100);

/// Re-fetches the rate every refresh interval and prints the conversion.
///
/// Stops after `max_refreshes` when given, otherwise on Ctrl-C.
pub async fn run(
    config: &AppConfig,
    coordinator: &RateCoordinator,
    overrides: &ConversionOverrides,
    max_refreshes: Option<usize>,
) -> Result<ConversionView> {
    let mut view = ConversionView::new(config, overrides);
    let interval = config.refresh_interval();
    info!(?interval, from = %view.from, to = %view.to, "Watching rate");

    let mut refreshes = 0;
    loop {
        if max_refreshes.is_some_and(|max| refreshes >= max) {
            break;
        }

        let spinner = ui::new_spinner("Fetching exchange rate...")?;
        let result = tokio::select! {
            result = coordinator.refresh(&view.from, &view.to) => result,
            _ = tokio::signal::ctrl_c() => {
                spinner.finish_and_clear();
                break;
            }
        };
        spinner.finish_and_clear();

        match result {
            Some(result) => view.apply_rate(result),
            None => debug!("Refresh skipped, previous fetch still running"),
        }
        println!("{}\n", view.render());

        refreshes += 1;
        if max_refreshes.is_some_and(|max| refreshes >= max) {
            break;
        }

        tokio::select! {
            res = wait_for_next_refresh(interval) => res?,
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!(refreshes, "Stopped watching");
    Ok(view)
}

async fn wait_for_next_refresh(interval: Duration) -> Result<()> {
    let bar = ui::new_refresh_bar(interval)?;
    let start = Instant::now();
    let mut ticker = tokio::time::interval(PROGRESS_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let elapsed = start.elapsed();
        if elapsed >= interval {
            break;
        }
        bar.set_position(elapsed.as_millis() as u64);
    }

    bar.finish_and_clear();
    Ok(())
}
