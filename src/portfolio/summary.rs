use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ValuationResult;
use crate::market_data::Currency;
use crate::math::{percent_of, ratio_or_zero};
use crate::models::Holdings;
use crate::valuation::{
    value_cash, value_crypto, value_equities, CashValuation, ClassValuation, ValuationContext,
};

/// Share of total value held in each class, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub crypto: Decimal,
    pub equities: Decimal,
    pub cash: Decimal,
}

impl Allocation {
    pub fn total(&self) -> Decimal {
        self.crypto + self.equities + self.cash
    }
}

/// Consolidated view of one portfolio in a single base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub base_currency: Currency,
    pub total_value: Decimal,
    pub crypto_value: Decimal,
    pub equities_value: Decimal,
    /// Fiat plus stablecoins.
    pub cash_value: Decimal,
    /// Stablecoin part of `cash_value`.
    pub stablecoin_value: Decimal,
    pub allocation: Allocation,
    /// Value-weighted 24h change of invested assets (cash excluded).
    pub change_24h_percent: Decimal,
}

/// Combine the three class valuations into totals, allocation and the
/// weighted 24h change.
///
/// Cash sits in the total and the allocation but not in the weighted change:
/// it would only dilute how the invested assets moved.
pub fn summarize(
    base_currency: Currency,
    crypto: &ClassValuation,
    equities: &ClassValuation,
    cash: &CashValuation,
) -> PortfolioSummary {
    let total_value = crypto.value + equities.value + cash.value;

    let allocation = if total_value > Decimal::ZERO {
        Allocation {
            crypto: percent_of(crypto.value, total_value),
            equities: percent_of(equities.value, total_value),
            cash: percent_of(cash.value, total_value),
        }
    } else {
        Allocation::default()
    };

    let change_24h_percent = ratio_or_zero(
        crypto.weighted_change + equities.weighted_change,
        crypto.value + equities.value,
    );

    PortfolioSummary {
        base_currency,
        total_value,
        crypto_value: crypto.value,
        equities_value: equities.value,
        cash_value: cash.value,
        stablecoin_value: cash.stablecoin_value,
        allocation,
        change_24h_percent,
    }
}

/// Everything one valuation call produces for a single portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub crypto: ClassValuation,
    pub equities: ClassValuation,
    pub cash: CashValuation,
    pub summary: PortfolioSummary,
}

impl PortfolioValuation {
    pub fn compute(holdings: &Holdings, ctx: &ValuationContext<'_>) -> ValuationResult<Self> {
        let crypto = value_crypto(holdings.crypto_assets(), ctx)?;
        let equities = value_equities(holdings.equity_assets(), ctx)?;
        let cash = value_cash(holdings, &crypto.stablecoins, ctx)?;
        let summary = summarize(ctx.base, &crypto.crypto, &equities, &cash);

        info!(
            base = %summary.base_currency,
            total = %summary.total_value,
            crypto = %summary.crypto_value,
            equities = %summary.equities_value,
            cash = %summary.cash_value,
            change_24h = %summary.change_24h_percent,
            "portfolio valued"
        );

        Ok(Self {
            crypto: crypto.crypto,
            equities,
            cash,
            summary,
        })
    }
}
