use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Currency;
use crate::error::ValuationResult;
use crate::math::checked_product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    /// Returned by a price provider for the current snapshot
    Live,
    /// Entered by the user for an instrument without a live price
    Manual,
}

/// A single price observation in one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteEntry {
    pub price: Decimal,
    /// 24h change in percent. `None` when the provider has no change data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_24h: Option<Decimal>,
}

impl QuoteEntry {
    pub fn new(price: Decimal, change_24h: Option<Decimal>) -> Self {
        Self { price, change_24h }
    }
}

/// A quote resolved for one asset in the currency it will be valued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQuote {
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_24h: Option<Decimal>,
    pub currency: Currency,
    pub source: QuoteSource,
}

impl ResolvedQuote {
    /// `value * change_24h`, the asset's share of a weighted-change numerator.
    pub fn weighted_change(&self, value: Decimal) -> ValuationResult<Decimal> {
        match self.change_24h {
            Some(change) => checked_product(value, change, "24h change"),
            // No change data reads as "did not move".
            None => Ok(Decimal::ZERO),
        }
    }
}

/// Crypto quotes come back from the provider in every requested currency at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CryptoQuote(BTreeMap<Currency, QuoteEntry>);

impl CryptoQuote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, currency: Currency, price: Decimal, change_24h: Option<Decimal>) -> Self {
        self.0.insert(currency, QuoteEntry::new(price, change_24h));
        self
    }

    pub fn entry(&self, currency: Currency) -> Option<&QuoteEntry> {
        self.0.get(&currency)
    }

    /// Select the price for `currency`. A quote without that currency is
    /// indistinguishable from no quote at all.
    pub fn resolve(&self, currency: Currency) -> Option<ResolvedQuote> {
        self.entry(currency).map(|entry| ResolvedQuote {
            price: entry.price,
            change_24h: entry.change_24h,
            currency,
            source: QuoteSource::Live,
        })
    }
}

/// Equity/ETF quote, always in the listing's single trading currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityQuote {
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_24h: Option<Decimal>,
    pub currency: Currency,
}

impl EquityQuote {
    pub fn new(price: Decimal, change_24h: Option<Decimal>, currency: Currency) -> Self {
        Self {
            price,
            change_24h,
            currency,
        }
    }

    pub fn resolve(&self) -> ResolvedQuote {
        ResolvedQuote {
            price: self.price,
            change_24h: self.change_24h,
            currency: self.currency,
            source: QuoteSource::Live,
        }
    }
}

/// All quotes for one valuation call, keyed by provider id (crypto) or
/// quote ticker (equities). Absent keys mean "unpriced".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceQuotes {
    #[serde(default)]
    pub crypto: HashMap<String, CryptoQuote>,
    #[serde(default)]
    pub equities: HashMap<String, EquityQuote>,
}

impl PriceQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crypto(mut self, provider_id: impl Into<String>, quote: CryptoQuote) -> Self {
        self.crypto.insert(provider_id.into(), quote);
        self
    }

    pub fn with_equity(mut self, ticker: impl Into<String>, quote: EquityQuote) -> Self {
        self.equities.insert(ticker.into(), quote);
        self
    }

    pub fn crypto(&self, provider_id: &str) -> Option<&CryptoQuote> {
        self.crypto
            .get(provider_id)
            .or_else(|| self.crypto.get(&provider_id.trim().to_lowercase()))
    }

    pub fn equity(&self, ticker: &str) -> Option<&EquityQuote> {
        self.equities
            .get(ticker)
            .or_else(|| self.equities.get(&ticker.trim().to_uppercase()))
    }

    pub fn is_empty(&self) -> bool {
        self.crypto.is_empty() && self.equities.is_empty()
    }
}
