mod currency;
mod fx;
mod models;
mod overrides;
mod provider;

pub use currency::Currency;
pub use fx::{convert, FxRateTable};
pub use models::{CryptoQuote, EquityQuote, PriceQuotes, QuoteEntry, QuoteSource, ResolvedQuote};
pub use overrides::{ManualPrice, ManualPrices, NoOverrides, PriceOverrides};
pub use provider::{FxProvider, MarketSnapshot, PriceProvider, StaticMarketData};
