#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tallybook::market_data::{
    CryptoQuote, Currency, EquityQuote, FxRateTable, MarketSnapshot, PriceQuotes, StaticMarketData,
};
use tallybook::portfolio::PortfolioService;

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// USD-based market with a handful of crypto and equity quotes.
pub fn usd_market() -> MarketSnapshot {
    MarketSnapshot {
        quotes: PriceQuotes::new()
            .with_crypto(
                "bitcoin",
                CryptoQuote::new()
                    .with(Currency::Usd, dec("50000"), Some(dec("10")))
                    .with(Currency::Eur, dec("40000"), Some(dec("9"))),
            )
            .with_crypto(
                "ethereum",
                CryptoQuote::new().with(Currency::Usd, dec("2500"), Some(dec("-4"))),
            )
            .with_crypto(
                "usd-coin",
                CryptoQuote::new().with(Currency::Usd, dec("1"), None),
            )
            .with_equity(
                "VWCE.DE",
                EquityQuote::new(dec("100"), Some(dec("2")), Currency::Eur),
            )
            .with_equity(
                "VWCE.AS",
                EquityQuote::new(dec("50"), Some(dec("-1")), Currency::Eur),
            )
            .with_equity(
                "AAPL",
                EquityQuote::new(dec("200"), Some(dec("1.5")), Currency::Usd),
            ),
        fx: FxRateTable::new(Currency::Usd)
            .with_rate(Currency::Eur, dec("1.1"))
            .with_rate(Currency::Chf, dec("1.2")),
    }
}

pub fn service(snapshot: MarketSnapshot) -> PortfolioService {
    let market = Arc::new(StaticMarketData::new(snapshot));
    PortfolioService::new(market.clone(), market)
}

/// Assert two decimals agree to 1e-20.
pub fn assert_close(actual: Decimal, expected: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= Decimal::new(1, 20),
        "expected {expected}, got {actual} (diff {diff})"
    );
}
