use rust_decimal::Decimal;

use crate::error::ValuationResult;
use crate::market_data::{
    convert, Currency, FxRateTable, NoOverrides, PriceOverrides, PriceQuotes, QuoteSource,
    ResolvedQuote,
};
use crate::models::Asset;

/// One coherent (quotes, rates) snapshot plus the currency to report in.
#[derive(Clone, Copy)]
pub struct ValuationContext<'a> {
    pub base: Currency,
    pub quotes: &'a PriceQuotes,
    pub rates: &'a FxRateTable,
    pub overrides: &'a dyn PriceOverrides,
}

impl<'a> ValuationContext<'a> {
    pub fn new(base: Currency, quotes: &'a PriceQuotes, rates: &'a FxRateTable) -> Self {
        Self {
            base,
            quotes,
            rates,
            overrides: &NoOverrides,
        }
    }

    pub fn with_overrides(mut self, overrides: &'a dyn PriceOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Convert `amount` of `from` into the base currency.
    pub fn to_base(&self, amount: Decimal, from: Currency) -> ValuationResult<Decimal> {
        convert(amount, from, self.base, self.rates)
    }

    /// The user's manual price for `asset`, if any.
    pub(crate) fn manual_quote(&self, asset: &Asset) -> Option<ResolvedQuote> {
        self.overrides
            .manual_price(asset)
            .map(|manual| ResolvedQuote {
                price: manual.price,
                change_24h: None,
                currency: manual.currency,
                source: QuoteSource::Manual,
            })
    }
}

impl std::fmt::Debug for ValuationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValuationContext")
            .field("base", &self.base)
            .field("quotes", &self.quotes)
            .field("rates", &self.rates)
            .finish_non_exhaustive()
    }
}
