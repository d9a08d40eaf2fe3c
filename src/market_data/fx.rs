use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Currency;
use crate::error::{ValuationError, ValuationResult};
use crate::math::checked_product;

/// Rates converting one unit of a currency into `base`.
///
/// A table is always fetched for a single base currency, so the target of
/// every conversion through it is implied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxRateTable {
    base: Currency,
    #[serde(default)]
    rates: HashMap<Currency, Decimal>,
}

impl FxRateTable {
    pub fn new(base: Currency) -> Self {
        Self {
            base,
            rates: HashMap::new(),
        }
    }

    pub fn with_rate(mut self, currency: Currency, rate: Decimal) -> Self {
        self.insert(currency, rate);
        self
    }

    pub fn insert(&mut self, currency: Currency, rate: Decimal) {
        self.rates.insert(currency, rate);
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    /// Units of base per one unit of `currency`.
    pub fn rate(&self, currency: Currency) -> ValuationResult<Decimal> {
        if currency == self.base {
            return Ok(Decimal::ONE);
        }
        self.rates
            .get(&currency)
            .copied()
            .ok_or(ValuationError::RateUnavailable {
                currency,
                base: self.base,
            })
    }

    pub fn contains(&self, currency: Currency) -> bool {
        currency == self.base || self.rates.contains_key(&currency)
    }

    /// Currencies from `currencies` this table cannot convert.
    pub fn missing(&self, currencies: impl IntoIterator<Item = Currency>) -> Vec<Currency> {
        let mut missing: Vec<Currency> = currencies
            .into_iter()
            .filter(|c| !self.contains(*c))
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}

/// Convert `amount` of `from` into `to` using `table`.
///
/// Same-currency conversion never touches the table. Any other conversion
/// requires `to` to be the table's base and `from` to have a rate.
pub fn convert(
    amount: Decimal,
    from: Currency,
    to: Currency,
    table: &FxRateTable,
) -> ValuationResult<Decimal> {
    if from == to {
        return Ok(amount);
    }
    if to != table.base() {
        return Err(ValuationError::BaseCurrencyMismatch {
            table: table.base(),
            requested: to,
        });
    }

    match table.rate(from) {
        Ok(rate) => checked_product(amount, rate, from.code()),
        Err(err) => {
            tracing::warn!(currency = %from, base = %table.base(), "FX rate unavailable");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn identity_conversion_ignores_table() {
        let empty = FxRateTable::new(Currency::Jpy);
        for currency in [Currency::Usd, Currency::Eur, Currency::Gbp] {
            let amount = dec("1234.5678");
            assert_eq!(convert(amount, currency, currency, &empty).unwrap(), amount);
        }
    }

    #[test]
    fn converts_into_base() {
        let table = FxRateTable::new(Currency::Usd).with_rate(Currency::Eur, dec("1.1"));
        let converted = convert(dec("1000"), Currency::Eur, Currency::Usd, &table).unwrap();
        assert_eq!(converted, dec("1100"));
    }

    #[test]
    fn missing_rate_fails_explicitly() {
        let table = FxRateTable::new(Currency::Usd).with_rate(Currency::Eur, dec("1.1"));
        let err = convert(dec("10"), Currency::Gbp, Currency::Usd, &table).unwrap_err();
        assert_eq!(
            err,
            ValuationError::RateUnavailable {
                currency: Currency::Gbp,
                base: Currency::Usd,
            }
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn conversion_into_non_base_currency_is_rejected() {
        let table = FxRateTable::new(Currency::Usd).with_rate(Currency::Eur, dec("1.1"));
        let err = convert(dec("10"), Currency::Eur, Currency::Gbp, &table).unwrap_err();
        assert!(matches!(err, ValuationError::BaseCurrencyMismatch { .. }));
    }

    #[test]
    fn missing_lists_each_currency_once() {
        let table = FxRateTable::new(Currency::Usd).with_rate(Currency::Eur, dec("1.1"));
        let missing = table.missing([
            Currency::Gbp,
            Currency::Usd,
            Currency::Eur,
            Currency::Gbp,
            Currency::Chf,
        ]);
        assert_eq!(missing, vec![Currency::Gbp, Currency::Chf]);
    }
}
