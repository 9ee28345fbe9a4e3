pub mod retail_rate;

pub use retail_rate::{DEFAULT_ENDPOINT, RetailRateProvider};
