//! Portfolio-level views built on top of the per-class valuations.

mod breakdown;
mod listings;
mod service;
mod snapshot;
mod summary;

pub use breakdown::{
    build_breakdown, cash_breakdown, crypto_breakdown, equities_breakdown, Breakdown,
    BreakdownEntry, BreakdownOptions, CryptoGrouping, Segment, ALTS_LABEL, FIAT_LABEL,
    OTHER_LABEL, STABLECOIN_LABEL,
};
pub use listings::{
    display_ticker, merge_listings, sort_listings, ListingEntry, ListingGroup, ListingRow,
    SortDirection, SortKey,
};
pub use service::{PortfolioService, QuoteRequest};
pub use snapshot::{change_over, change_since, snapshot_as_of, PeriodChange, SummarySnapshot};
pub use summary::{summarize, Allocation, PortfolioSummary, PortfolioValuation};
