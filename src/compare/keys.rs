//! Canonical keys identifying one logical instrument across two portfolios.

use crate::market_data::Currency;
use crate::models::Asset;
use crate::portfolio::display_ticker;

pub const CASH_KEY_PREFIX: &str = "cash:";
pub const STOCK_KEY_PREFIX: &str = "stock:";

/// Crypto is keyed by provider id; stablecoins are cash keyed by ticker.
pub fn crypto_key(asset: &Asset) -> String {
    if asset.is_stablecoin() {
        return format!("{CASH_KEY_PREFIX}{}", asset.ticker.trim().to_uppercase());
    }
    match asset.provider_id().map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => asset.ticker.trim().to_uppercase(),
    }
}

/// Equities are keyed by display ticker so every listing of an instrument
/// lands on the same key.
pub fn equity_key(ticker: &str) -> String {
    format!("{STOCK_KEY_PREFIX}{}", display_ticker(ticker))
}

pub fn cash_key(currency: Currency) -> String {
    format!("{CASH_KEY_PREFIX}{}", currency.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_uses_provider_id() {
        let btc = Asset::crypto("BTC", "Bitcoin", "bitcoin");
        assert_eq!(crypto_key(&btc), "bitcoin");
    }

    #[test]
    fn stablecoin_becomes_cash_key() {
        let usdc = Asset::crypto("usdc", "USD Coin", "usd-coin").with_subcategory("stablecoin");
        assert_eq!(crypto_key(&usdc), "cash:USDC");
    }

    #[test]
    fn cross_listings_share_equity_key() {
        assert_eq!(equity_key("VWCE.DE"), "stock:VWCE");
        assert_eq!(equity_key("VWCE.AS"), equity_key("VWCE.DE"));
        assert_eq!(equity_key("AAPL"), "stock:AAPL");
    }

    #[test]
    fn cash_is_keyed_by_currency() {
        assert_eq!(cash_key(Currency::Eur), "cash:EUR");
    }
}
