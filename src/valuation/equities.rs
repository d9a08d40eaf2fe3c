use tracing::debug;

use super::{total_quantity, AssetValuation, ClassValuation, ValuationContext};
use crate::error::ValuationResult;
use crate::market_data::ResolvedQuote;
use crate::math::checked_product;
use crate::models::{Asset, AssetClass};

/// Value one equity/ETF holding.
///
/// The quote is looked up by the asset's quote ticker and the native value
/// is converted from the asset's settlement currency into the base. The
/// 24h change is currency-invariant and taken from the native quote.
pub fn value_equity_asset(asset: &Asset, ctx: &ValuationContext<'_>) -> ValuationResult<AssetValuation> {
    let quantity = total_quantity(&asset.positions);

    let live = ctx.quotes.equity(asset.quote_ticker()).map(|quote| {
        if quote.currency != asset.currency {
            debug!(
                ticker = %asset.ticker,
                quote_currency = %quote.currency,
                asset_currency = %asset.currency,
                "Equity quote currency differs from asset currency"
            );
        }
        ResolvedQuote {
            currency: asset.currency,
            ..quote.resolve()
        }
    });

    let Some(quote) = live.or_else(|| ctx.manual_quote(asset)) else {
        debug!(ticker = %asset.ticker, quote_ticker = %asset.quote_ticker(), "No equity quote, valuing at zero");
        return Ok(AssetValuation::unpriced(asset, AssetClass::Equities, quantity));
    };

    let native_value = checked_product(quantity, quote.price, &asset.ticker)?;
    let value = ctx.to_base(native_value, quote.currency)?;
    AssetValuation::priced(asset, AssetClass::Equities, quantity, &quote, value)
}

pub fn value_equities<'a>(
    assets: impl IntoIterator<Item = &'a Asset>,
    ctx: &ValuationContext<'_>,
) -> ValuationResult<ClassValuation> {
    assets
        .into_iter()
        .map(|asset| value_equity_asset(asset, ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;
    use crate::market_data::{Currency, EquityQuote, FxRateTable, PriceQuotes};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn converts_native_value_to_base() {
        let quotes = PriceQuotes::new().with_equity(
            "SAP.DE",
            EquityQuote::new(dec("100"), Some(dec("2")), Currency::Eur),
        );
        let rates = FxRateTable::new(Currency::Usd).with_rate(Currency::Eur, dec("1.1"));
        let ctx = ValuationContext::new(Currency::Usd, &quotes, &rates);

        let sap = Asset::equity("SAP.DE", "SAP", Currency::Eur).with_position("Broker", dec("10"));
        let valued = value_equity_asset(&sap, &ctx).unwrap();

        assert_eq!(valued.quantity * valued.price.unwrap(), dec("1000"));
        assert_eq!(valued.value, dec("1100"));
        assert_eq!(valued.weighted_change, dec("2200"));
    }

    #[test]
    fn looks_up_by_provider_ticker() {
        let quotes = PriceQuotes::new().with_equity(
            "BRK-B",
            EquityQuote::new(dec("400"), None, Currency::Usd),
        );
        let rates = FxRateTable::new(Currency::Usd);
        let ctx = ValuationContext::new(Currency::Usd, &quotes, &rates);

        let brk = Asset::equity("BRK.B", "Berkshire Hathaway", Currency::Usd)
            .with_provider_ticker("BRK-B")
            .with_position("Broker", dec("3"));

        let class = value_equities([&brk], &ctx).unwrap();
        assert_eq!(class.value, dec("1200"));
        assert_eq!(class.weighted_change, Decimal::ZERO);
    }

    #[test]
    fn missing_rate_surfaces_as_error() {
        let quotes = PriceQuotes::new().with_equity(
            "VOD.L",
            EquityQuote::new(dec("0.7"), Some(dec("1")), Currency::Gbp),
        );
        let rates = FxRateTable::new(Currency::Usd).with_rate(Currency::Eur, dec("1.1"));
        let ctx = ValuationContext::new(Currency::Usd, &quotes, &rates);

        let vod = Asset::equity("VOD.L", "Vodafone", Currency::Gbp).with_position("Broker", dec("100"));
        let err = value_equities([&vod], &ctx).unwrap_err();
        assert_eq!(
            err,
            ValuationError::RateUnavailable {
                currency: Currency::Gbp,
                base: Currency::Usd,
            }
        );
    }

    #[test]
    fn unpriced_equity_needs_no_rate() {
        let quotes = PriceQuotes::new();
        let rates = FxRateTable::new(Currency::Usd);
        let ctx = ValuationContext::new(Currency::Usd, &quotes, &rates);

        let vod = Asset::equity("VOD.L", "Vodafone", Currency::Gbp).with_position("Broker", dec("100"));
        let class = value_equities([&vod], &ctx).unwrap();
        assert_eq!(class.value, Decimal::ZERO);
        assert_eq!(class.assets.len(), 1);
    }

    #[test]
    fn conversion_out_of_range_is_an_error() {
        let quotes = PriceQuotes::new().with_equity(
            "SAP.DE",
            EquityQuote::new(dec("1"), None, Currency::Eur),
        );
        let rates = FxRateTable::new(Currency::Usd).with_rate(Currency::Eur, dec("2"));
        let ctx = ValuationContext::new(Currency::Usd, &quotes, &rates);

        let sap = Asset::equity("SAP.DE", "SAP", Currency::Eur)
            .with_position("Broker", dec("50000000000000000000000000000"));
        let err = value_equity_asset(&sap, &ctx).unwrap_err();
        assert_eq!(err, ValuationError::Overflow("EUR".to_string()));
    }
}
