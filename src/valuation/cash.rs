use rust_decimal::Decimal;

use super::{AssetValuation, CashLine, CashSource, CashValuation, ValuationContext};
use crate::error::ValuationResult;
use crate::market_data::Currency;
use crate::models::Holdings;

fn cash_line(
    source: CashSource,
    label: &str,
    currency: Currency,
    amount: Decimal,
    ctx: &ValuationContext<'_>,
) -> ValuationResult<CashLine> {
    Ok(CashLine {
        source,
        label: label.to_string(),
        currency,
        amount,
        value: ctx.to_base(amount, currency)?,
    })
}

/// Value bank balances and exchange/broker deposits, then fold in the
/// stablecoins the crypto valuator routed to cash.
///
/// Cash has no price and no 24h change.
pub fn value_cash(
    holdings: &Holdings,
    stablecoins: &[AssetValuation],
    ctx: &ValuationContext<'_>,
) -> ValuationResult<CashValuation> {
    let mut lines = Vec::new();
    for account in &holdings.bank_accounts {
        lines.push(cash_line(
            CashSource::Bank,
            &account.name,
            account.currency,
            account.balance,
            ctx,
        )?);
    }
    for deposit in &holdings.exchange_deposits {
        lines.push(cash_line(
            CashSource::Exchange,
            &deposit.location,
            deposit.currency,
            deposit.amount,
            ctx,
        )?);
    }
    for deposit in &holdings.broker_deposits {
        lines.push(cash_line(
            CashSource::Broker,
            &deposit.location,
            deposit.currency,
            deposit.amount,
            ctx,
        )?);
    }

    let mut valuation = CashValuation::default();
    for line in &lines {
        valuation.fiat_value += line.value;
        valuation.by_currency.entry(line.currency).or_default().fiat += line.value;
    }
    for coin in stablecoins {
        valuation.stablecoin_value += coin.value;
        valuation
            .by_currency
            .entry(coin.currency)
            .or_default()
            .stablecoin += coin.value;
    }

    valuation.value = valuation.fiat_value + valuation.stablecoin_value;
    valuation.lines = lines;
    valuation.stablecoins = stablecoins.to_vec();
    Ok(valuation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::{CryptoQuote, FxRateTable, PriceQuotes};
    use crate::models::{Asset, BankAccount, Deposit};
    use crate::valuation::value_crypto;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn converts_and_splits_fiat_from_stablecoins() {
        let quotes = PriceQuotes::new().with_crypto(
            "usd-coin",
            CryptoQuote::new().with(Currency::Eur, dec("0.9"), Some(dec("0.1"))),
        );
        let rates = FxRateTable::new(Currency::Eur)
            .with_rate(Currency::Usd, dec("0.9"))
            .with_rate(Currency::Gbp, dec("1.2"));
        let ctx = ValuationContext::new(Currency::Eur, &quotes, &rates);

        let holdings = Holdings::new()
            .with_asset(
                Asset::crypto("USDC", "USD Coin", "usd-coin")
                    .with_subcategory("stablecoin")
                    .with_position("Coinbase", dec("100")),
            )
            .with_bank_account(BankAccount::new("Checking", Currency::Eur, dec("1000")))
            .with_bank_account(BankAccount::new("UK Savings", Currency::Gbp, dec("500")))
            .with_exchange_deposit(Deposit::new("Kraken", Currency::Usd, dec("200")))
            .with_broker_deposit(Deposit::new("IBKR", Currency::Eur, dec("50")));

        let crypto = value_crypto(holdings.crypto_assets(), &ctx).unwrap();
        let cash = value_cash(&holdings, &crypto.stablecoins, &ctx).unwrap();

        // 1000 + 500*1.2 + 200*0.9 + 50
        assert_eq!(cash.fiat_value, dec("1830"));
        assert_eq!(cash.stablecoin_value, dec("90"));
        assert_eq!(cash.value, dec("1920"));

        let usd = cash.by_currency[&Currency::Usd];
        assert_eq!(usd.fiat, dec("180"));
        assert_eq!(usd.stablecoin, dec("90"));
        assert_eq!(cash.by_currency[&Currency::Eur].fiat, dec("1050"));
        assert_eq!(cash.lines.len(), 4);
        assert_eq!(cash.lines[2].source, CashSource::Exchange);
    }

    #[test]
    fn missing_rate_fails() {
        let quotes = PriceQuotes::new();
        let rates = FxRateTable::new(Currency::Usd);
        let ctx = ValuationContext::new(Currency::Usd, &quotes, &rates);

        let holdings =
            Holdings::new().with_bank_account(BankAccount::new("UK", Currency::Gbp, dec("1")));
        assert!(value_cash(&holdings, &[], &ctx).is_err());
    }
}
