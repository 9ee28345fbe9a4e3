//! Trade value calculation

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Inputs to [`compute_trade`]. `None` marks a value the user has not
/// provided yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeInput<'a> {
    pub amount: Option<f64>,
    pub exchange_rate: Option<f64>,
    pub markup_rate: Option<f64>,
    pub precision: Option<usize>,
    pub from_currency: Option<&'a str>,
    pub to_currency: Option<&'a str>,
}

/// Display figures for one trade. Either all four are present or there is
/// no computation at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeComputation {
    pub trade_cost: String,
    pub trade_value: String,
    pub trade_value_received: String,
    pub cost: String,
}

// Zero and NaN count as "not provided", matching how the amount and rate
// inputs are treated upstream.
fn provided(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

fn provided_code(code: Option<&str>) -> Option<&str> {
    code.filter(|c| !c.is_empty())
}

// Rounds half away from zero on the exact binary value. Values or scales
// beyond what `Decimal` can hold use the formatter's own rounding.
fn format_fixed(value: f64, precision: usize) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let rounded = u32::try_from(precision).ok().and_then(|dp| {
        let mut decimal = Decimal::from_f64_retain(value)?
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
        decimal.rescale(dp);
        (decimal.scale() == dp).then(|| decimal.to_string())
    });
    Some(rounded.unwrap_or_else(|| format!("{value:.precision$}")))
}

/// Computes the gross, net and margin figures for converting `amount` at
/// `exchange_rate` less a `markup_rate` fraction.
///
/// Returns `None` when any input is missing, or when amount, exchange rate or
/// markup rate is zero. A zero precision is valid.
pub fn compute_trade(input: &TradeInput<'_>) -> Option<TradeComputation> {
    let amount = provided(input.amount)?;
    let exchange_rate = provided(input.exchange_rate)?;
    let markup_rate = provided(input.markup_rate)?;
    let precision = input.precision?;
    let from_currency = provided_code(input.from_currency)?;
    let to_currency = provided_code(input.to_currency)?;

    let markup_amount = markup_rate * exchange_rate;
    let effective_rate = exchange_rate - markup_amount;

    let gross_value = exchange_rate * amount;
    let net_value = effective_rate * amount;
    let cost = gross_value - net_value;

    let gross_value = format_fixed(gross_value, precision)?;
    let net_value = format_fixed(net_value, precision)?;
    let cost = format_fixed(cost, precision)?;

    Some(TradeComputation {
        trade_cost: format!("{amount} {from_currency}"),
        trade_value: format!("{gross_value} {to_currency}"),
        trade_value_received: format!("{net_value} {to_currency}"),
        cost: format!("{cost} {to_currency}"),
    })
}
