pub mod compare;
pub mod config;
pub mod error;
pub mod format;
pub mod market_data;
pub mod math;
pub mod models;
pub mod portfolio;
pub mod valuation;
