//! Merging of cross-listed equities (e.g. `VWCE.DE` and `VWCE.AS`) into one
//! row per logical instrument.

use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market_data::Currency;
use crate::math::ratio_or_zero;
use crate::valuation::AssetValuation;

const LISTING_SEPARATOR: char = '.';

/// Ticker with any exchange suffix removed, uppercased.
pub fn display_ticker(ticker: &str) -> String {
    let ticker = ticker.trim();
    match ticker.split_once(LISTING_SEPARATOR) {
        Some((head, _)) if !head.is_empty() => head.to_uppercase(),
        _ => ticker.to_uppercase(),
    }
}

/// One exchange listing, valued in the base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRow {
    pub ticker: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub currency: Currency,
    pub value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_24h: Option<Decimal>,
}

impl ListingRow {
    pub fn from_valuation(asset: &AssetValuation) -> Self {
        Self {
            ticker: asset.ticker.clone(),
            name: asset.name.clone(),
            category: asset.classification.category.clone(),
            currency: asset.currency,
            value: asset.value,
            change_24h: asset.change_24h,
        }
    }
}

/// Several listings of the same instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingGroup {
    pub display_ticker: String,
    /// Name, category and currency come from the highest-value variant.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub currency: Currency,
    pub total_value: Decimal,
    /// Value-weighted 24h change across variants, in percent.
    pub weighted_change: Decimal,
    /// Largest first.
    pub variants: Vec<ListingRow>,
}

impl ListingGroup {
    fn from_variants(display_ticker: String, mut variants: Vec<ListingRow>) -> Option<Self> {
        variants.sort_by(|a, b| b.value.cmp(&a.value));
        let representative = variants.first()?.clone();

        let total_value: Decimal = variants.iter().map(|v| v.value).sum();
        let weighted: Decimal = variants
            .iter()
            .map(|v| v.value * v.change_24h.unwrap_or(Decimal::ZERO))
            .sum();

        Some(Self {
            display_ticker,
            name: representative.name,
            category: representative.category,
            currency: representative.currency,
            total_value,
            weighted_change: ratio_or_zero(weighted, total_value),
            variants,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingEntry {
    Single(ListingRow),
    Group(ListingGroup),
}

impl ListingEntry {
    pub fn display_ticker(&self) -> String {
        match self {
            ListingEntry::Single(row) => display_ticker(&row.ticker),
            ListingEntry::Group(group) => group.display_ticker.clone(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ListingEntry::Single(row) => &row.name,
            ListingEntry::Group(group) => &group.name,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            ListingEntry::Single(row) => row.category.as_deref(),
            ListingEntry::Group(group) => group.category.as_deref(),
        }
    }

    pub fn currency(&self) -> Currency {
        match self {
            ListingEntry::Single(row) => row.currency,
            ListingEntry::Group(group) => group.currency,
        }
    }

    pub fn value(&self) -> Decimal {
        match self {
            ListingEntry::Single(row) => row.value,
            ListingEntry::Group(group) => group.total_value,
        }
    }

    pub fn change_24h(&self) -> Option<Decimal> {
        match self {
            ListingEntry::Single(row) => row.change_24h,
            ListingEntry::Group(group) => Some(group.weighted_change),
        }
    }
}

/// Merge rows sharing a display ticker. A group takes the position of its
/// first row; tickers with a single listing stay as they are.
pub fn merge_listings(rows: Vec<ListingRow>) -> Vec<ListingEntry> {
    let mut order: Vec<(String, Vec<ListingRow>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let key = display_ticker(&row.ticker);
        match index.get(&key) {
            Some(&idx) => order[idx].1.push(row),
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, vec![row]));
            }
        }
    }

    order
        .into_iter()
        .filter_map(|(key, mut variants)| {
            if variants.len() == 1 {
                variants.pop().map(ListingEntry::Single)
            } else {
                ListingGroup::from_variants(key, variants).map(ListingEntry::Group)
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Value,
    Name,
    Type,
    Change,
    Currency,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

fn compare_by(a: &ListingEntry, b: &ListingEntry, key: SortKey) -> Ordering {
    match key {
        SortKey::Value => a.value().cmp(&b.value()),
        SortKey::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortKey::Type => a
            .category()
            .map(str::to_lowercase)
            .cmp(&b.category().map(str::to_lowercase)),
        SortKey::Change => a.change_24h().cmp(&b.change_24h()),
        SortKey::Currency => a.currency().code().cmp(b.currency().code()),
    }
}

/// Stable sort: equal keys keep their input order in either direction.
pub fn sort_listings(entries: &mut [ListingEntry], key: SortKey, direction: SortDirection) {
    entries.sort_by(|a, b| {
        let ordering = compare_by(a, b, key);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
