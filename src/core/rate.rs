//! Exchange rate abstractions and core types

use async_trait::async_trait;
use thiserror::Error;

use super::currency::currency_for_country;

/// Failures surfaced by a rate fetch.
///
/// Both variants are recovered locally and reported as values; neither is
/// fatal to the caller.
#[derive(Error, Debug)]
pub enum RateError {
    /// A currency identifier was empty or not in the lookup table.
    /// Raised before any request is made.
    #[error("Invalid currency")]
    InvalidCurrency,

    /// The request failed, returned a non-success status, timed out or
    /// carried a body that could not be parsed.
    #[error("Could not fetch exchange rate")]
    FetchFailure(#[source] anyhow::Error),
}

impl RateError {
    pub fn fetch_failure(cause: impl Into<anyhow::Error>) -> Self {
        RateError::FetchFailure(cause.into())
    }
}

pub type RateResult = Result<f64, RateError>;

/// A currency pair that has been resolved against the lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuery {
    pub sell_currency: &'static str,
    pub buy_currency: &'static str,
}

impl RateQuery {
    /// Resolves two country identifiers into a sell/buy currency pair.
    pub fn resolve(from_country: &str, to_country: &str) -> Result<Self, RateError> {
        let sell_currency = currency_for_country(from_country).ok_or(RateError::InvalidCurrency)?;
        let buy_currency = currency_for_country(to_country).ok_or(RateError::InvalidCurrency)?;
        Ok(RateQuery {
            sell_currency,
            buy_currency,
        })
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the retail rate for selling `from_country`'s currency and
    /// buying `to_country`'s. A missing or zero rate in the response is
    /// replaced with `fallback_rate`.
    async fn fetch_rate(
        &self,
        from_country: &str,
        to_country: &str,
        fallback_rate: f64,
    ) -> RateResult;
}
