use crate::market_data::Currency;

/// Failures the valuation engine can report.
///
/// Everything else (unpriced assets, empty denominators, unknown
/// classifications) degrades to zero or an "Other" bucket instead of failing.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValuationError {
    #[error("FX rate unavailable for {currency} (base {base})")]
    RateUnavailable { currency: Currency, base: Currency },

    #[error("Rate table is expressed in {table}, cannot convert into {requested}")]
    BaseCurrencyMismatch {
        table: Currency,
        requested: Currency,
    },

    #[error("Unsupported currency code: {0:?}")]
    UnsupportedCurrency(String),

    #[error("Value out of range for {0}")]
    Overflow(String),
}

impl ValuationError {
    /// Missing rates can be fixed by re-fetching the rate table.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ValuationError::RateUnavailable { .. })
    }
}

pub type ValuationResult<T> = Result<T, ValuationError>;
