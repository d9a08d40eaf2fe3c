//! Per-class breakdowns for display: crypto by subtype, equities by category
//! or tag, cash by currency with a fiat/stablecoin split.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{display_ticker, PortfolioValuation};
use crate::math::percent_of;
use crate::valuation::{AssetValuation, CashValuation, ClassValuation};

pub const OTHER_LABEL: &str = "Other";
pub const ALTS_LABEL: &str = "Alts";
pub const FIAT_LABEL: &str = "Fiat";
pub const STABLECOIN_LABEL: &str = "Stablecoin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub label: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub value: Decimal,
    /// Share of the class total, in percent.
    pub percent: Decimal,
    /// Constituents, largest first. Empty when the entry has a single one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub crypto: Vec<BreakdownEntry>,
    pub equities: Vec<BreakdownEntry>,
    pub cash: Vec<BreakdownEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CryptoGrouping {
    /// Standalone tickers, then one entry per subcategory.
    #[default]
    Subtype,
    /// Standalone tickers, then everything else as "Alts".
    BitcoinVsAlts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakdownOptions {
    pub crypto_grouping: CryptoGrouping,
    /// Crypto tickers broken out as their own entry.
    pub standalone_tickers: Vec<String>,
}

impl Default for BreakdownOptions {
    fn default() -> Self {
        Self {
            crypto_grouping: CryptoGrouping::default(),
            standalone_tickers: vec!["BTC".to_string()],
        }
    }
}

impl BreakdownOptions {
    fn is_standalone(&self, ticker: &str) -> bool {
        self.standalone_tickers
            .iter()
            .any(|t| t.trim().eq_ignore_ascii_case(ticker.trim()))
    }
}

/// Accumulates labelled segments in first-seen order.
#[derive(Default)]
struct Grouper {
    groups: Vec<(String, Vec<Segment>)>,
    index: HashMap<String, usize>,
}

impl Grouper {
    fn add(&mut self, label: &str, segment_label: &str, value: Decimal) {
        let idx = *self.index.entry(label.to_string()).or_insert_with(|| {
            self.groups.push((label.to_string(), Vec::new()));
            self.groups.len() - 1
        });
        let segments = &mut self.groups[idx].1;
        match segments.iter_mut().find(|s| s.label == segment_label) {
            Some(existing) => existing.value += value,
            None => segments.push(Segment {
                label: segment_label.to_string(),
                value,
            }),
        }
    }

    fn finish(self, class_total: Decimal) -> Vec<BreakdownEntry> {
        let entries = self
            .groups
            .into_iter()
            .map(|(label, segments)| {
                let value = segments.iter().map(|s| s.value).sum();
                entry(label, value, class_total, segments)
            })
            .collect();
        sort_entries(entries)
    }
}

fn entry(
    label: String,
    value: Decimal,
    class_total: Decimal,
    mut segments: Vec<Segment>,
) -> BreakdownEntry {
    segments.retain(|s| !s.value.is_zero());
    if segments.len() > 1 {
        segments.sort_by(|a, b| b.value.cmp(&a.value));
    } else {
        segments.clear();
    }
    BreakdownEntry {
        label,
        value,
        percent: percent_of(value, class_total),
        segments,
    }
}

fn sort_entries(mut entries: Vec<BreakdownEntry>) -> Vec<BreakdownEntry> {
    entries.retain(|e| !e.value.is_zero());
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn valued(assets: &[AssetValuation]) -> impl Iterator<Item = &AssetValuation> {
    assets.iter().filter(|a| !a.value.is_zero())
}

pub fn crypto_breakdown(crypto: &ClassValuation, options: &BreakdownOptions) -> Vec<BreakdownEntry> {
    let mut grouper = Grouper::default();
    let mut others = Vec::new();

    for asset in valued(&crypto.assets) {
        let ticker = asset.ticker.trim().to_uppercase();
        if options.is_standalone(&ticker) {
            grouper.add(&ticker, &ticker, asset.value);
        } else {
            others.push((ticker, asset));
        }
    }

    match options.crypto_grouping {
        CryptoGrouping::Subtype => {
            for (ticker, asset) in others {
                let label = non_empty(asset.classification.subcategory.as_deref())
                    .unwrap_or(OTHER_LABEL);
                grouper.add(label, &ticker, asset.value);
            }
            grouper.finish(crypto.value)
        }
        CryptoGrouping::BitcoinVsAlts => {
            let standalone: Decimal = grouper
                .groups
                .iter()
                .flat_map(|(_, segments)| segments.iter().map(|s| s.value))
                .sum();
            let mut alts = Grouper::default();
            for (ticker, asset) in others {
                alts.add(ALTS_LABEL, &ticker, asset.value);
            }
            let segments = alts
                .groups
                .pop()
                .map(|(_, segments)| segments)
                .unwrap_or_default();

            let mut entries = grouper.finish(crypto.value);
            entries.push(entry(
                ALTS_LABEL.to_string(),
                crypto.value - standalone,
                crypto.value,
                segments,
            ));
            sort_entries(entries)
        }
    }
}

/// Group equities by category; a category with a single member is labelled
/// by that member's first tag instead. Cross-listings of one instrument
/// count as a single member.
pub fn equities_breakdown(equities: &ClassValuation) -> Vec<BreakdownEntry> {
    let mut members: HashMap<Option<&str>, HashSet<String>> = HashMap::new();
    for asset in valued(&equities.assets) {
        members
            .entry(non_empty(asset.classification.category.as_deref()))
            .or_default()
            .insert(display_ticker(&asset.ticker));
    }

    let mut grouper = Grouper::default();
    for asset in valued(&equities.assets) {
        let category = non_empty(asset.classification.category.as_deref());
        let member_count = members.get(&category).map_or(0, HashSet::len);
        let label = if member_count > 1 {
            category
        } else {
            asset
                .classification
                .tags
                .iter()
                .map(String::as_str)
                .find_map(|t| non_empty(Some(t)))
                .or(category)
        };
        grouper.add(
            label.unwrap_or(OTHER_LABEL),
            &display_ticker(&asset.ticker),
            asset.value,
        );
    }
    grouper.finish(equities.value)
}

pub fn cash_breakdown(cash: &CashValuation) -> Vec<BreakdownEntry> {
    let entries = cash
        .by_currency
        .iter()
        .map(|(currency, split)| {
            let segments = vec![
                Segment {
                    label: FIAT_LABEL.to_string(),
                    value: split.fiat,
                },
                Segment {
                    label: STABLECOIN_LABEL.to_string(),
                    value: split.stablecoin,
                },
            ];
            entry(currency.code().to_string(), split.total(), cash.value, segments)
        })
        .collect();
    sort_entries(entries)
}

pub fn build_breakdown(valuation: &PortfolioValuation, options: &BreakdownOptions) -> Breakdown {
    Breakdown {
        crypto: crypto_breakdown(&valuation.crypto, options),
        equities: equities_breakdown(&valuation.equities),
        cash: cash_breakdown(&valuation.cash),
    }
}
