use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{cash_key, crypto_key, equity_key};
use crate::error::ValuationResult;
use crate::market_data::Currency;
use crate::math::ratio_or_zero;
use crate::models::{AssetClass, Holdings};
use crate::portfolio::display_ticker;
use crate::valuation::{value_crypto_asset, value_equity_asset, ValuationContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Viewer,
    Owner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlap {
    Shared,
    ViewerOnly,
    OwnerOnly,
}

/// One logical instrument with the value each portfolio holds of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingItem {
    pub key: String,
    pub name: String,
    pub ticker: String,
    pub class: AssetClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub viewer_value: Decimal,
    pub owner_value: Decimal,
}

impl HoldingItem {
    pub fn max_value(&self) -> Decimal {
        self.viewer_value.max(self.owner_value)
    }

    /// Owner minus viewer.
    pub fn delta(&self) -> Decimal {
        self.owner_value - self.viewer_value
    }

    /// A side holds the item when its value is non-zero, so negative
    /// balances (overdrafts) still count.
    pub fn partition(&self) -> Overlap {
        let viewer = !self.viewer_value.is_zero();
        let owner = !self.owner_value.is_zero();
        match (viewer, owner) {
            (true, true) => Overlap::Shared,
            (true, false) => Overlap::ViewerOnly,
            _ => Overlap::OwnerOnly,
        }
    }

    fn is_empty(&self) -> bool {
        self.viewer_value.is_zero() && self.owner_value.is_zero()
    }
}

/// A single item's value from one side, before folding.
struct Contribution {
    key: String,
    name: String,
    ticker: String,
    class: AssetClass,
    image: Option<String>,
    value: Decimal,
}

fn contributions(holdings: &Holdings, ctx: &ValuationContext<'_>) -> ValuationResult<Vec<Contribution>> {
    let mut out = Vec::new();

    for asset in holdings.crypto_assets() {
        let valued = value_crypto_asset(asset, ctx)?;
        out.push(Contribution {
            key: crypto_key(asset),
            name: asset.name.clone(),
            ticker: asset.ticker.trim().to_uppercase(),
            class: valued.class,
            image: asset.image.clone(),
            value: valued.value,
        });
    }

    for asset in holdings.equity_assets() {
        let valued = value_equity_asset(asset, ctx)?;
        out.push(Contribution {
            key: equity_key(&asset.ticker),
            name: asset.name.clone(),
            ticker: display_ticker(&asset.ticker),
            class: AssetClass::Equities,
            image: asset.image.clone(),
            value: valued.value,
        });
    }

    let cash = holdings
        .bank_accounts
        .iter()
        .map(|b| (b.currency, b.balance))
        .chain(holdings.deposits().map(|d| (d.currency, d.amount)));
    for (currency, amount) in cash {
        out.push(Contribution {
            key: cash_key(currency),
            name: currency.code().to_string(),
            ticker: currency.code().to_string(),
            class: AssetClass::Cash,
            image: None,
            value: ctx.to_base(amount, currency)?,
        });
    }

    Ok(out)
}

/// Holding items in first-seen key order.
#[derive(Default)]
struct Accumulator {
    items: Vec<HoldingItem>,
    index: HashMap<String, usize>,
}

impl Accumulator {
    fn fold(mut self, side: Side, contribution: Contribution) -> Self {
        let value = contribution.value;
        let idx = match self.index.get(&contribution.key) {
            Some(&idx) => {
                let item = &mut self.items[idx];
                if item.image.is_none() {
                    item.image = contribution.image;
                }
                idx
            }
            None => {
                self.index
                    .insert(contribution.key.clone(), self.items.len());
                self.items.push(HoldingItem {
                    key: contribution.key,
                    name: contribution.name,
                    ticker: contribution.ticker,
                    class: contribution.class,
                    image: contribution.image,
                    viewer_value: Decimal::ZERO,
                    owner_value: Decimal::ZERO,
                });
                self.items.len() - 1
            }
        };

        let item = &mut self.items[idx];
        match side {
            Side::Viewer => item.viewer_value += value,
            Side::Owner => item.owner_value += value,
        }
        self
    }
}

/// Deduplicated union of two portfolios' holdings, largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingsComparison {
    pub currency: Currency,
    pub items: Vec<HoldingItem>,
}

impl HoldingsComparison {
    pub fn items(&self) -> &[HoldingItem] {
        &self.items
    }

    fn in_partition(&self, overlap: Overlap) -> impl Iterator<Item = &HoldingItem> {
        self.items.iter().filter(move |i| i.partition() == overlap)
    }

    pub fn shared(&self) -> impl Iterator<Item = &HoldingItem> {
        self.in_partition(Overlap::Shared)
    }

    pub fn viewer_only(&self) -> impl Iterator<Item = &HoldingItem> {
        self.in_partition(Overlap::ViewerOnly)
    }

    pub fn owner_only(&self) -> impl Iterator<Item = &HoldingItem> {
        self.in_partition(Overlap::OwnerOnly)
    }

    /// Shared keys over all distinct keys.
    pub fn overlap_ratio(&self) -> Decimal {
        ratio_or_zero(
            Decimal::from(self.shared().count()),
            Decimal::from(self.items.len()),
        )
    }

    /// `(key, owner - viewer)` per item.
    pub fn deltas(&self) -> Vec<(&str, Decimal)> {
        self.items
            .iter()
            .map(|i| (i.key.as_str(), i.delta()))
            .collect()
    }
}

/// Compare two portfolios priced against the same quotes and rates.
///
/// Both sides must be valued from one snapshot, so callers request quotes
/// for the union of both portfolios' instruments.
pub fn compare_holdings(
    viewer: &Holdings,
    owner: &Holdings,
    ctx: &ValuationContext<'_>,
) -> ValuationResult<HoldingsComparison> {
    let viewer_side = contributions(viewer, ctx)?;
    let owner_side = contributions(owner, ctx)?;

    let accumulated = viewer_side
        .into_iter()
        .map(|c| (Side::Viewer, c))
        .chain(owner_side.into_iter().map(|c| (Side::Owner, c)))
        .fold(Accumulator::default(), |acc, (side, c)| acc.fold(side, c));

    let mut items: Vec<HoldingItem> = accumulated
        .items
        .into_iter()
        .filter(|item| {
            let keep = !item.is_empty();
            if !keep {
                debug!(key = %item.key, "Dropping holding with no value on either side");
            }
            keep
        })
        .collect();
    items.sort_by(|a, b| b.max_value().cmp(&a.max_value()));

    Ok(HoldingsComparison {
        currency: ctx.base,
        items,
    })
}
