use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::Currency;
use crate::models::Asset;

/// A user-entered price for an instrument the providers cannot price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualPrice {
    pub price: Decimal,
    pub currency: Currency,
}

/// Consulted by the class valuators before an asset is treated as unpriced.
pub trait PriceOverrides: Send + Sync {
    fn manual_price(&self, asset: &Asset) -> Option<ManualPrice>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl PriceOverrides for NoOverrides {
    fn manual_price(&self, _asset: &Asset) -> Option<ManualPrice> {
        None
    }
}

/// Manual prices keyed by uppercased ticker.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ManualPrices(HashMap<String, ManualPrice>);

impl<'de> Deserialize<'de> for ManualPrices {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, ManualPrice>::deserialize(deserializer)?;
        let mut prices = Self::new();
        for (ticker, price) in raw {
            prices.insert(&ticker, price);
        }
        Ok(prices)
    }
}

impl ManualPrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON object of `ticker -> { price, currency }`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manual prices file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manual prices file: {}", path.display()))
    }

    pub fn with(mut self, ticker: &str, price: Decimal, currency: Currency) -> Self {
        self.insert(ticker, ManualPrice { price, currency });
        self
    }

    pub fn insert(&mut self, ticker: &str, price: ManualPrice) {
        self.0.insert(ticker.trim().to_uppercase(), price);
    }
}

impl PriceOverrides for ManualPrices {
    fn manual_price(&self, asset: &Asset) -> Option<ManualPrice> {
        self.0.get(&asset.ticker.trim().to_uppercase()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn lookup_ignores_ticker_case() {
        let prices = ManualPrices::new().with("vwce", Decimal::from(100), Currency::Eur);
        let asset = Asset::equity("VWCE", "Vanguard", Currency::Eur);
        assert_eq!(
            prices.manual_price(&asset),
            Some(ManualPrice {
                price: Decimal::from(100),
                currency: Currency::Eur
            })
        );
        assert!(NoOverrides.manual_price(&asset).is_none());
    }

    #[test]
    fn load_normalizes_keys() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("manual.json");
        std::fs::write(&path, r#"{"pxd": {"price": "12.5", "currency": "usd"}}"#)?;

        let prices = ManualPrices::load(&path)?;
        let asset = Asset::equity("PXD", "Pioneer", Currency::Usd);
        assert_eq!(
            prices.manual_price(&asset).map(|p| p.price),
            Some(Decimal::from_str("12.5")?)
        );
        Ok(())
    }
}
