use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValuationResult;
use crate::market_data::{Currency, QuoteSource, ResolvedQuote};
use crate::math::ratio_or_zero;
use crate::models::{Asset, AssetClass, Classification};

/// Value of one asset in the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetValuation {
    pub ticker: String,
    pub name: String,
    /// Class the asset is reported under (stablecoins report as cash).
    pub class: AssetClass,
    /// Native settlement currency (pegged currency for stablecoins).
    pub currency: Currency,
    #[serde(default)]
    pub classification: Classification,
    pub quantity: Decimal,
    /// Unit price in the quote's currency. `None` when unpriced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_24h: Option<Decimal>,
    pub value: Decimal,
    /// `value * change_24h`; zero when there is no change data.
    pub weighted_change: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_source: Option<QuoteSource>,
}

impl AssetValuation {
    pub(crate) fn unpriced(asset: &Asset, class: AssetClass, quantity: Decimal) -> Self {
        Self {
            ticker: asset.ticker.clone(),
            name: asset.name.clone(),
            class,
            currency: asset.currency,
            classification: asset.classification.clone(),
            quantity,
            price: None,
            change_24h: None,
            value: Decimal::ZERO,
            weighted_change: Decimal::ZERO,
            quote_source: None,
        }
    }

    pub(crate) fn priced(
        asset: &Asset,
        class: AssetClass,
        quantity: Decimal,
        quote: &ResolvedQuote,
        value: Decimal,
    ) -> ValuationResult<Self> {
        Ok(Self {
            price: Some(quote.price),
            change_24h: quote.change_24h,
            weighted_change: quote.weighted_change(value)?,
            value,
            quote_source: Some(quote.source),
            ..Self::unpriced(asset, class, quantity)
        })
    }

    pub fn is_priced(&self) -> bool {
        self.price.is_some()
    }
}

/// Running totals for one asset class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassValuation {
    pub value: Decimal,
    /// Sum of `value * change_24h` over the class.
    pub weighted_change: Decimal,
    pub assets: Vec<AssetValuation>,
}

impl ClassValuation {
    pub fn push(&mut self, asset: AssetValuation) {
        self.value += asset.value;
        self.weighted_change += asset.weighted_change;
        self.assets.push(asset);
    }

    /// Value-weighted 24h change of the class, in percent.
    pub fn change_percent(&self) -> Decimal {
        ratio_or_zero(self.weighted_change, self.value)
    }
}

impl FromIterator<AssetValuation> for ClassValuation {
    fn from_iter<I: IntoIterator<Item = AssetValuation>>(iter: I) -> Self {
        let mut class = ClassValuation::default();
        for asset in iter {
            class.push(asset);
        }
        class
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoValuation {
    pub crypto: ClassValuation,
    /// Stablecoins, valued like crypto but reported under cash.
    pub stablecoins: Vec<AssetValuation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashSource {
    Bank,
    Exchange,
    Broker,
}

/// One cash balance converted to the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashLine {
    pub source: CashSource,
    pub label: String,
    pub currency: Currency,
    pub amount: Decimal,
    pub value: Decimal,
}

/// Base-currency cash held in one currency, split by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyCash {
    pub fiat: Decimal,
    pub stablecoin: Decimal,
}

impl CurrencyCash {
    pub fn total(&self) -> Decimal {
        self.fiat + self.stablecoin
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashValuation {
    /// Fiat plus stablecoins.
    pub value: Decimal,
    pub fiat_value: Decimal,
    pub stablecoin_value: Decimal,
    pub by_currency: BTreeMap<Currency, CurrencyCash>,
    pub lines: Vec<CashLine>,
    pub stablecoins: Vec<AssetValuation>,
}
