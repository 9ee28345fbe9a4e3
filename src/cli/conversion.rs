use chrono::{DateTime, Local};
use comfy_table::Cell;
use tracing::debug;

use super::ui;
use crate::core::config::AppConfig;
use crate::core::currency::currency_for_country;
use crate::core::{RateResult, TradeComputation, TradeInput, compute_trade};

const ROUNDED_PRECISION: usize = 2;
const FULL_PRECISION: usize = 20;

/// Command line overrides for the configured conversion defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionOverrides {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<f64>,
    pub no_round: bool,
}

/// What the user is converting and the last rate seen for it.
#[derive(Debug, Clone)]
pub struct ConversionView {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub round_results: bool,
    pub markup_rate: f64,
    /// `None` once a fetch has failed.
    pub exchange_rate: Option<f64>,
    pub updated_at: Option<DateTime<Local>>,
}

impl ConversionView {
    pub fn new(config: &AppConfig, overrides: &ConversionOverrides) -> Self {
        let defaults = &config.defaults;
        ConversionView {
            from: overrides.from.clone().unwrap_or_else(|| defaults.from.clone()),
            to: overrides.to.clone().unwrap_or_else(|| defaults.to.clone()),
            amount: overrides.amount.unwrap_or(defaults.amount),
            round_results: defaults.round_results && !overrides.no_round,
            markup_rate: config.markup_rate,
            exchange_rate: Some(config.fallback_rate),
            updated_at: None,
        }
    }

    pub fn apply_rate(&mut self, result: RateResult) {
        match result {
            Ok(rate) => {
                debug!(rate, "Applying fetched rate");
                self.exchange_rate = Some(rate);
            }
            Err(e) => {
                debug!(error = %e, "Clearing rate after failed fetch");
                self.exchange_rate = None;
            }
        }
        self.updated_at = Some(Local::now());
    }

    pub fn precision(&self) -> usize {
        if self.round_results {
            ROUNDED_PRECISION
        } else {
            FULL_PRECISION
        }
    }

    pub fn trade(&self) -> Option<TradeComputation> {
        compute_trade(&TradeInput {
            amount: Some(self.amount),
            exchange_rate: self.exchange_rate,
            markup_rate: Some(self.markup_rate),
            precision: Some(self.precision()),
            from_currency: currency_for_country(&self.from),
            to_currency: currency_for_country(&self.to),
        })
    }

    fn currency_label(country: &str) -> String {
        match currency_for_country(country) {
            Some(code) => format!("{code} ({country})"),
            None => format!("? ({country})"),
        }
    }

    pub fn render(&self) -> String {
        let mut output = format!(
            "{}\n\n",
            ui::style_text("Currency Conversion", ui::StyleType::Title)
        );

        output.push_str(&format!(
            "{} {}  ->  {} {}\n",
            ui::style_text("From:", ui::StyleType::Label),
            Self::currency_label(&self.from),
            ui::style_text("To:", ui::StyleType::Label),
            Self::currency_label(&self.to),
        ));

        match self.exchange_rate {
            Some(rate) => output.push_str(&format!(
                "{} {}\n",
                ui::style_text("Rate:", ui::StyleType::Label),
                ui::style_text(&rate.to_string(), ui::StyleType::Rate)
            )),
            None => output.push_str(&format!(
                "{} {}\n{}\n",
                ui::style_text("Rate:", ui::StyleType::Label),
                ui::style_text("Error", ui::StyleType::Error),
                ui::style_text("Rate error, please try again", ui::StyleType::Error)
            )),
        }

        output.push_str(&format!(
            "{} {}\n",
            ui::style_text("Amount:", ui::StyleType::Label),
            self.amount
        ));

        if let Some(trade) = self.trade() {
            output.push('\n');
            output.push_str(&trade_table(&trade));
            output.push('\n');
        }

        if let Some(updated_at) = self.updated_at {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!("Updated {}", updated_at.format("%H:%M:%S")),
                    ui::StyleType::Subtle
                )
            ));
        }

        output
    }
}

fn trade_table(trade: &TradeComputation) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Trade cost"),
        ui::header_cell("Trade value"),
        ui::header_cell("Trade value received"),
        ui::header_cell("Margin cost"),
    ]);
    table.add_row(vec![
        Cell::new(&trade.trade_cost),
        ui::amount_cell(&trade.trade_value),
        ui::amount_cell(&trade.trade_value_received),
        ui::amount_cell(&trade.cost),
    ]);

    format!(
        "{}\n{table}",
        ui::style_text("Trade Details", ui::StyleType::Label)
    )
}
