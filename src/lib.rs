pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::conversion::{ConversionOverrides, ConversionView};
use crate::core::RateCoordinator;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert(ConversionOverrides),
    Watch {
        overrides: ConversionOverrides,
        max_refreshes: Option<usize>,
    },
    Countries,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

fn build_coordinator(config: &AppConfig) -> Result<RateCoordinator> {
    let provider = providers::RetailRateProvider::new(&config.provider.base_url)?;
    Ok(RateCoordinator::new(
        Arc::new(provider),
        config.fallback_rate,
        config.request_timeout(),
    ))
}

/// Runs a command and returns the final conversion state, if it has one.
pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
) -> Result<Option<ConversionView>> {
    info!("fxrate starting...");

    match command {
        AppCommand::Countries => {
            cli::countries::run();
            Ok(None)
        }
        AppCommand::Convert(overrides) => {
            let config = load_config(config_path)?;
            let coordinator = build_coordinator(&config)?;
            cli::convert::run(&config, &coordinator, &overrides)
                .await
                .map(Some)
        }
        AppCommand::Watch {
            overrides,
            max_refreshes,
        } => {
            let config = load_config(config_path)?;
            let coordinator = build_coordinator(&config)?;
            cli::watch::run(&config, &coordinator, &overrides, max_refreshes)
                .await
                .map(Some)
        }
    }
}
