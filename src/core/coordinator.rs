//! Single-slot coordination of rate fetches

use anyhow::anyhow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use super::rate::{RateError, RateProvider, RateResult};

/// Allows at most one rate fetch to be outstanding.
///
/// Triggers that arrive while a fetch is in flight are dropped, not queued.
/// Every fetch is bounded by `timeout` so a hung request releases the slot.
pub struct RateCoordinator {
    provider: Arc<dyn RateProvider>,
    fallback_rate: f64,
    timeout: Duration,
    in_flight: AtomicBool,
}

// Releases the slot on completion, timeout, or when the caller drops the future.
struct SlotGuard<'a>(&'a AtomicBool);

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RateCoordinator {
    pub fn new(provider: Arc<dyn RateProvider>, fallback_rate: f64, timeout: Duration) -> Self {
        RateCoordinator {
            provider,
            fallback_rate,
            timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetches the rate for the pair unless another fetch is outstanding.
    ///
    /// Returns `None` when the trigger was dropped.
    pub async fn refresh(&self, from_country: &str, to_country: &str) -> Option<RateResult> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(from_country, to_country, "Fetch in flight, dropping trigger");
            return None;
        }
        let _guard = SlotGuard(&self.in_flight);

        let fetch = self
            .provider
            .fetch_rate(from_country, to_country, self.fallback_rate);
        let result = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.timeout, "Rate fetch timed out");
                Err(RateError::fetch_failure(anyhow!(
                    "Timed out after {:?} fetching {}/{}",
                    self.timeout,
                    from_country,
                    to_country
                )))
            }
        };
        Some(result)
    }
}
