//! Core business logic abstractions

pub mod config;
pub mod coordinator;
pub mod currency;
pub mod log;
pub mod rate;
pub mod trade;

// Re-export main types for cleaner imports
pub use coordinator::RateCoordinator;
pub use rate::{RateError, RateProvider, RateQuery, RateResult};
pub use trade::{TradeComputation, TradeInput, compute_trade};
