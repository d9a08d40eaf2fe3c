use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CryptoQuote, Currency, EquityQuote, FxRateTable, PriceQuotes};
use crate::error::ValuationError;

/// Source of live quotes. Identifiers missing from the returned map are
/// unpriced, which is not an error.
#[async_trait::async_trait]
pub trait PriceProvider: Send + Sync {
    async fn crypto_quotes(
        &self,
        provider_ids: &[String],
        currencies: &[Currency],
    ) -> Result<HashMap<String, CryptoQuote>>;

    async fn equity_quotes(&self, tickers: &[String]) -> Result<HashMap<String, EquityQuote>>;

    fn name(&self) -> &str;
}

/// Source of FX rates. Every requested currency is expected to resolve.
#[async_trait::async_trait]
pub trait FxProvider: Send + Sync {
    async fn rates(&self, base: Currency, currencies: &[Currency]) -> Result<FxRateTable>;

    fn name(&self) -> &str;
}

/// A point-in-time set of quotes and rates, as exported by a price cache or
/// written by hand for offline use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub quotes: PriceQuotes,
    pub fx: FxRateTable,
}

/// Serves quotes and rates from a fixed [`MarketSnapshot`].
#[derive(Debug, Clone)]
pub struct StaticMarketData {
    snapshot: MarketSnapshot,
}

impl StaticMarketData {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read market data file: {}", path.display()))?;
        let snapshot: MarketSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse market data file: {}", path.display()))?;
        Ok(Self::new(snapshot))
    }

    /// Rate for `currency` against `base`, rebasing through the snapshot's
    /// own base when the two differ.
    fn rebased_rate(&self, currency: Currency, base: Currency) -> Result<Decimal, ValuationError> {
        let table = &self.snapshot.fx;
        if table.base() == base {
            return table.rate(currency);
        }
        let unavailable = || ValuationError::RateUnavailable { currency, base };
        let currency_in_table = table.rate(currency).map_err(|_| unavailable())?;
        let base_in_table = table.rate(base).map_err(|_| unavailable())?;
        if base_in_table.is_zero() {
            return Err(unavailable());
        }
        Ok(currency_in_table / base_in_table)
    }
}

#[async_trait::async_trait]
impl PriceProvider for StaticMarketData {
    async fn crypto_quotes(
        &self,
        provider_ids: &[String],
        _currencies: &[Currency],
    ) -> Result<HashMap<String, CryptoQuote>> {
        Ok(provider_ids
            .iter()
            .filter_map(|id| {
                self.snapshot
                    .quotes
                    .crypto(id)
                    .map(|quote| (id.clone(), quote.clone()))
            })
            .collect())
    }

    async fn equity_quotes(&self, tickers: &[String]) -> Result<HashMap<String, EquityQuote>> {
        Ok(tickers
            .iter()
            .filter_map(|ticker| {
                self.snapshot
                    .quotes
                    .equity(ticker)
                    .map(|quote| (ticker.clone(), *quote))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[async_trait::async_trait]
impl FxProvider for StaticMarketData {
    async fn rates(&self, base: Currency, currencies: &[Currency]) -> Result<FxRateTable> {
        let mut table = FxRateTable::new(base);
        for currency in currencies.iter().copied().filter(|c| *c != base) {
            let rate = self.rebased_rate(currency, base)?;
            table.insert(currency, rate);
        }
        Ok(table)
    }

    fn name(&self) -> &str {
        "static"
    }
}
