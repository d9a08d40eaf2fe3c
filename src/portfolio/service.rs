use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

use super::PortfolioValuation;
use crate::compare::{compare_holdings, HoldingsComparison};
use crate::market_data::{
    Currency, FxProvider, MarketSnapshot, NoOverrides, PriceOverrides, PriceProvider, PriceQuotes,
};
use crate::models::Holdings;
use crate::valuation::ValuationContext;

/// Identifiers one valuation call needs quotes and rates for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteRequest {
    pub crypto_ids: Vec<String>,
    pub equity_tickers: Vec<String>,
    pub currencies: Vec<Currency>,
}

impl QuoteRequest {
    /// Union over every portfolio, so they can all be priced from one snapshot.
    pub fn for_holdings(portfolios: &[&Holdings], overrides: &dyn PriceOverrides) -> Self {
        let mut crypto_ids = BTreeSet::new();
        let mut equity_tickers = BTreeSet::new();
        let mut currencies = BTreeSet::new();

        for holdings in portfolios {
            for asset in holdings.crypto_assets() {
                if let Some(id) = asset.provider_id() {
                    crypto_ids.insert(id.to_string());
                }
            }
            for asset in holdings.equity_assets() {
                equity_tickers.insert(asset.quote_ticker().to_string());
            }
            for asset in &holdings.assets {
                if let Some(manual) = overrides.manual_price(asset) {
                    currencies.insert(manual.currency);
                }
            }
            currencies.extend(holdings.fx_currencies());
        }

        Self {
            crypto_ids: crypto_ids.into_iter().collect(),
            equity_tickers: equity_tickers.into_iter().collect(),
            currencies: currencies.into_iter().collect(),
        }
    }
}

/// Fetches one coherent market snapshot and runs the valuation engine on it.
pub struct PortfolioService {
    prices: Arc<dyn PriceProvider>,
    fx: Arc<dyn FxProvider>,
    overrides: Arc<dyn PriceOverrides>,
}

impl PortfolioService {
    pub fn new(prices: Arc<dyn PriceProvider>, fx: Arc<dyn FxProvider>) -> Self {
        Self {
            prices,
            fx,
            overrides: Arc::new(NoOverrides),
        }
    }

    pub fn with_overrides(mut self, overrides: Arc<dyn PriceOverrides>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn required_identifiers(&self, portfolios: &[&Holdings]) -> QuoteRequest {
        QuoteRequest::for_holdings(portfolios, self.overrides.as_ref())
    }

    /// Fetch quotes and rates concurrently.
    pub async fn fetch(&self, request: &QuoteRequest, base: Currency) -> Result<MarketSnapshot> {
        let quote_currencies = [base];
        let (crypto, equities, fx) = tokio::try_join!(
            self.prices.crypto_quotes(&request.crypto_ids, &quote_currencies),
            self.prices.equity_quotes(&request.equity_tickers),
            self.fx.rates(base, &request.currencies),
        )
        .with_context(|| {
            format!(
                "Failed to fetch market data (prices: {}, fx: {})",
                self.prices.name(),
                self.fx.name()
            )
        })?;

        let missing = fx.missing(request.currencies.iter().copied());
        if !missing.is_empty() {
            warn!(base = %base, missing = ?missing, provider = self.fx.name(), "FX provider omitted rates");
        }

        Ok(MarketSnapshot {
            quotes: PriceQuotes { crypto, equities },
            fx,
        })
    }

    pub async fn value(&self, holdings: &Holdings, base: Currency) -> Result<PortfolioValuation> {
        let request = self.required_identifiers(&[holdings]);
        let market = self.fetch(&request, base).await?;
        let ctx = ValuationContext::new(base, &market.quotes, &market.fx)
            .with_overrides(self.overrides.as_ref());

        PortfolioValuation::compute(holdings, &ctx)
            .with_context(|| format!("Failed to value portfolio in {base}"))
    }

    pub async fn compare(
        &self,
        viewer: &Holdings,
        owner: &Holdings,
        target: Currency,
    ) -> Result<HoldingsComparison> {
        let request = self.required_identifiers(&[viewer, owner]);
        let market = self.fetch(&request, target).await?;
        let ctx = ValuationContext::new(target, &market.quotes, &market.fx)
            .with_overrides(self.overrides.as_ref());

        compare_holdings(viewer, owner, &ctx)
            .with_context(|| format!("Failed to compare portfolios in {target}"))
    }
}
