use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Position;
use crate::market_data::Currency;

/// Subcategory that routes a crypto asset into the cash class.
pub const STABLECOIN_SUBCATEGORY: &str = "stablecoin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Crypto,
    Equities,
    Cash,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Crypto => "crypto",
            AssetClass::Equities => "equities",
            AssetClass::Cash => "cash",
        }
    }
}

/// Class-specific identification.
/// The `type` field determines which other fields are present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetKind {
    Crypto {
        /// Price-provider id (e.g. "bitcoin").
        provider_id: String,
    },
    Equity {
        /// Alternate ticker used for quote lookups when the display ticker
        /// differs from the provider's symbol.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_ticker: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
}

/// A held instrument and every position that holds it.
///
/// Equities must name their settlement currency when deserialized; crypto
/// assets default to USD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AssetRecord")]
pub struct Asset {
    pub ticker: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: AssetKind,
    /// Native settlement currency. For stablecoins, the pegged currency.
    pub currency: Currency,
    #[serde(default)]
    pub classification: Classification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub positions: Vec<Position>,
}

/// On-disk shape of an [`Asset`], before the currency rule is applied.
#[derive(Deserialize)]
struct AssetRecord {
    ticker: String,
    name: String,
    #[serde(flatten)]
    kind: AssetKind,
    #[serde(default)]
    currency: Option<Currency>,
    #[serde(default)]
    classification: Classification,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    positions: Vec<Position>,
}

impl TryFrom<AssetRecord> for Asset {
    type Error = String;

    fn try_from(record: AssetRecord) -> Result<Self, Self::Error> {
        let currency = match (&record.kind, record.currency) {
            (_, Some(currency)) => currency,
            (AssetKind::Crypto { .. }, None) => Currency::Usd,
            (AssetKind::Equity { .. }, None) => {
                return Err(format!("equity {} has no currency", record.ticker));
            }
        };
        Ok(Self {
            ticker: record.ticker,
            name: record.name,
            kind: record.kind,
            currency,
            classification: record.classification,
            image: record.image,
            positions: record.positions,
        })
    }
}

impl Asset {
    pub fn crypto(
        ticker: impl Into<String>,
        name: impl Into<String>,
        provider_id: impl Into<String>,
    ) -> Self {
        Self::new(
            ticker,
            name,
            AssetKind::Crypto {
                provider_id: provider_id.into(),
            },
            Currency::Usd,
        )
    }

    pub fn equity(ticker: impl Into<String>, name: impl Into<String>, currency: Currency) -> Self {
        Self::new(
            ticker,
            name,
            AssetKind::Equity {
                provider_ticker: None,
            },
            currency,
        )
    }

    fn new(
        ticker: impl Into<String>,
        name: impl Into<String>,
        kind: AssetKind,
        currency: Currency,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            kind,
            currency,
            classification: Classification::default(),
            image: None,
            positions: Vec::new(),
        }
    }

    pub fn with_position(mut self, location: impl Into<String>, quantity: Decimal) -> Self {
        self.positions.push(Position::new(location, quantity));
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.classification.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.classification.category = Some(category.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.classification.tags.push(tag.into());
        self
    }

    pub fn with_provider_ticker(mut self, provider_ticker: impl Into<String>) -> Self {
        if let AssetKind::Equity { provider_ticker: slot } = &mut self.kind {
            *slot = Some(provider_ticker.into());
        }
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Class of the record itself. Stablecoins are still `Crypto` here;
    /// valuation moves them into cash.
    pub fn class(&self) -> AssetClass {
        match self.kind {
            AssetKind::Crypto { .. } => AssetClass::Crypto,
            AssetKind::Equity { .. } => AssetClass::Equities,
        }
    }

    pub fn is_stablecoin(&self) -> bool {
        matches!(self.kind, AssetKind::Crypto { .. })
            && self
                .classification
                .subcategory
                .as_deref()
                .is_some_and(|s| s.trim().eq_ignore_ascii_case(STABLECOIN_SUBCATEGORY))
    }

    pub fn provider_id(&self) -> Option<&str> {
        match &self.kind {
            AssetKind::Crypto { provider_id } => Some(provider_id),
            AssetKind::Equity { .. } => None,
        }
    }

    /// Ticker used to look up an equity quote.
    pub fn quote_ticker(&self) -> &str {
        match &self.kind {
            AssetKind::Equity {
                provider_ticker: Some(alt),
            } if !alt.trim().is_empty() => alt,
            _ => &self.ticker,
        }
    }
}
