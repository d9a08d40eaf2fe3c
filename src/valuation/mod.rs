//! Per-class valuators: turn holdings plus one quotes/rates snapshot into
//! base-currency values and weighted 24h change contributions.

mod cash;
mod context;
mod crypto;
mod equities;
mod models;
mod positions;

pub use cash::value_cash;
pub use context::ValuationContext;
pub use crypto::{value_crypto, value_crypto_asset};
pub use equities::{value_equities, value_equity_asset};
pub use models::{
    AssetValuation, CashLine, CashSource, CashValuation, ClassValuation, CryptoValuation,
    CurrencyCash,
};
pub use positions::total_quantity;
