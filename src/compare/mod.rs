//! Side-by-side comparison of two independently owned portfolios.

mod comparator;
mod keys;

pub use comparator::{compare_holdings, HoldingItem, HoldingsComparison, Overlap, Side};
pub use keys::{cash_key, crypto_key, equity_key, CASH_KEY_PREFIX, STOCK_KEY_PREFIX};
