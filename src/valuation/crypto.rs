use tracing::debug;

use super::{total_quantity, AssetValuation, CryptoValuation, ValuationContext};
use crate::error::ValuationResult;
use crate::math::checked_product;
use crate::models::{Asset, AssetClass};

/// Value one crypto asset.
///
/// Crypto quotes are natively multi-currency, so a live price is taken
/// directly in the base currency with no FX step. Stablecoins come back
/// classed as [`AssetClass::Cash`].
pub fn value_crypto_asset(asset: &Asset, ctx: &ValuationContext<'_>) -> ValuationResult<AssetValuation> {
    let class = if asset.is_stablecoin() {
        AssetClass::Cash
    } else {
        AssetClass::Crypto
    };
    let quantity = total_quantity(&asset.positions);

    let live = asset
        .provider_id()
        .and_then(|id| ctx.quotes.crypto(id))
        .and_then(|quote| quote.resolve(ctx.base));

    let Some(quote) = live.or_else(|| ctx.manual_quote(asset)) else {
        debug!(ticker = %asset.ticker, base = %ctx.base, "No crypto price, valuing at zero");
        return Ok(AssetValuation::unpriced(asset, class, quantity));
    };

    let native_value = checked_product(quantity, quote.price, &asset.ticker)?;
    let value = ctx.to_base(native_value, quote.currency)?;
    AssetValuation::priced(asset, class, quantity, &quote, value)
}

/// Value every crypto asset, routing stablecoins out of the crypto class.
pub fn value_crypto<'a>(
    assets: impl IntoIterator<Item = &'a Asset>,
    ctx: &ValuationContext<'_>,
) -> ValuationResult<CryptoValuation> {
    let mut valuation = CryptoValuation::default();

    for asset in assets {
        let valued = value_crypto_asset(asset, ctx)?;
        match valued.class {
            AssetClass::Cash => valuation.stablecoins.push(valued),
            _ => valuation.crypto.push(valued),
        }
    }

    Ok(valuation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;
    use crate::market_data::{
        CryptoQuote, Currency, FxRateTable, ManualPrices, PriceQuotes, QuoteSource,
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn quotes() -> PriceQuotes {
        PriceQuotes::new()
            .with_crypto(
                "bitcoin",
                CryptoQuote::new()
                    .with(Currency::Usd, dec("50000"), Some(dec("10")))
                    .with(Currency::Eur, dec("45000"), Some(dec("9"))),
            )
            .with_crypto(
                "usd-coin",
                CryptoQuote::new().with(Currency::Usd, dec("1"), Some(dec("0.01"))),
            )
    }

    #[test]
    fn sums_positions_before_pricing() {
        let quotes = quotes();
        let rates = FxRateTable::new(Currency::Usd);
        let ctx = ValuationContext::new(Currency::Usd, &quotes, &rates);

        let btc = Asset::crypto("BTC", "Bitcoin", "bitcoin")
            .with_position("Ledger", dec("1"))
            .with_position("Kraken", dec("1"));

        let valuation = value_crypto([&btc], &ctx).unwrap();
        assert_eq!(valuation.crypto.value, dec("100000"));
        assert_eq!(valuation.crypto.weighted_change, dec("1000000"));
        assert_eq!(valuation.crypto.change_percent(), dec("10"));
    }

    #[test]
    fn uses_base_currency_entry_of_quote() {
        let quotes = quotes();
        let rates = FxRateTable::new(Currency::Eur);
        let ctx = ValuationContext::new(Currency::Eur, &quotes, &rates);

        let btc = Asset::crypto("BTC", "Bitcoin", "bitcoin").with_position("Ledger", dec("2"));
        let valued = value_crypto_asset(&btc, &ctx).unwrap();
        assert_eq!(valued.value, dec("90000"));
        assert_eq!(valued.change_24h, Some(dec("9")));
    }

    #[test]
    fn unpriced_asset_contributes_nothing() {
        let quotes = quotes();
        let rates = FxRateTable::new(Currency::Usd);
        let ctx = ValuationContext::new(Currency::Usd, &quotes, &rates);

        let obscure = Asset::crypto("XYZ", "Obscure", "obscure-token").with_position("Wallet", dec("1000"));
        let valuation = value_crypto([&obscure], &ctx).unwrap();

        assert_eq!(valuation.crypto.value, Decimal::ZERO);
        assert_eq!(valuation.crypto.weighted_change, Decimal::ZERO);
        assert_eq!(valuation.crypto.assets.len(), 1);
        assert!(!valuation.crypto.assets[0].is_priced());
    }

    #[test]
    fn stablecoins_leave_the_crypto_class() {
        let quotes = quotes();
        let rates = FxRateTable::new(Currency::Usd);
        let ctx = ValuationContext::new(Currency::Usd, &quotes, &rates);

        let btc = Asset::crypto("BTC", "Bitcoin", "bitcoin").with_position("Ledger", dec("1"));
        let usdc = Asset::crypto("USDC", "USD Coin", "usd-coin")
            .with_subcategory("stablecoin")
            .with_position("Coinbase", dec("500"));

        let valuation = value_crypto([&btc, &usdc], &ctx).unwrap();
        assert_eq!(valuation.crypto.value, dec("50000"));
        assert_eq!(valuation.crypto.assets.len(), 1);
        assert_eq!(valuation.stablecoins.len(), 1);
        assert_eq!(valuation.stablecoins[0].value, dec("500"));
        assert_eq!(valuation.stablecoins[0].class, AssetClass::Cash);
    }

    #[test]
    fn manual_price_fills_in_for_missing_quote() {
        let quotes = quotes();
        let rates = FxRateTable::new(Currency::Usd).with_rate(Currency::Eur, dec("1.1"));
        let overrides = ManualPrices::new().with("xyz", dec("2"), Currency::Eur);
        let ctx = ValuationContext::new(Currency::Usd, &quotes, &rates).with_overrides(&overrides);

        let obscure = Asset::crypto("XYZ", "Obscure", "obscure-token").with_position("Wallet", dec("10"));
        let valued = value_crypto_asset(&obscure, &ctx).unwrap();

        assert_eq!(valued.value, dec("22"));
        assert_eq!(valued.change_24h, None);
        assert_eq!(valued.weighted_change, Decimal::ZERO);
        assert_eq!(valued.quote_source, Some(QuoteSource::Manual));
    }

    #[test]
    fn value_out_of_range_is_an_error() {
        let quotes = quotes();
        let rates = FxRateTable::new(Currency::Usd);
        let ctx = ValuationContext::new(Currency::Usd, &quotes, &rates);

        let btc = Asset::crypto("BTC", "Bitcoin", "bitcoin")
            .with_position("Ledger", dec("10000000000000000000000000"));
        let err = value_crypto([&btc], &ctx).unwrap_err();
        assert_eq!(err, ValuationError::Overflow("BTC".to_string()));
        assert!(!err.is_retryable());
    }
}
