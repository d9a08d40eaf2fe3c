use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PortfolioSummary;
use crate::market_data::Currency;
use crate::math::percent_of;

/// The part of a [`PortfolioSummary`] kept by the snapshot store for
/// historical change calculations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySnapshot {
    pub taken_at: DateTime<Utc>,
    pub base_currency: Currency,
    pub total_value: Decimal,
    pub crypto_value: Decimal,
    pub equities_value: Decimal,
    pub cash_value: Decimal,
}

impl SummarySnapshot {
    pub fn capture(summary: &PortfolioSummary, taken_at: DateTime<Utc>) -> Self {
        Self {
            taken_at,
            base_currency: summary.base_currency,
            total_value: summary.total_value,
            crypto_value: summary.crypto_value,
            equities_value: summary.equities_value,
            cash_value: summary.cash_value,
        }
    }

    pub fn now(summary: &PortfolioSummary) -> Self {
        Self::capture(summary, Utc::now())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodChange {
    pub since: DateTime<Utc>,
    pub absolute: Decimal,
    /// Percent of the earlier total. Zero when that total was zero.
    pub percent: Decimal,
}

/// Change of total value from `previous` to `current`.
///
/// Returns `None` when the two are in different currencies; comparing them
/// would need historical FX, which the snapshot does not carry.
pub fn change_since(previous: &SummarySnapshot, current: &PortfolioSummary) -> Option<PeriodChange> {
    if previous.base_currency != current.base_currency {
        return None;
    }
    let absolute = current.total_value - previous.total_value;
    Some(PeriodChange {
        since: previous.taken_at,
        absolute,
        percent: percent_of(absolute, previous.total_value),
    })
}

/// Most recent snapshot taken at or before `as_of`.
pub fn snapshot_as_of(snapshots: &[SummarySnapshot], as_of: DateTime<Utc>) -> Option<&SummarySnapshot> {
    snapshots
        .iter()
        .filter(|s| s.taken_at <= as_of)
        .max_by_key(|s| s.taken_at)
}

/// Change over a trailing window (e.g. 7 days), using the latest snapshot
/// that is at least `window` old.
pub fn change_over(
    snapshots: &[SummarySnapshot],
    current: &PortfolioSummary,
    now: DateTime<Utc>,
    window: Duration,
) -> Option<PeriodChange> {
    snapshot_as_of(snapshots, now - window).and_then(|previous| change_since(previous, current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::Allocation;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn summary(total: &str, currency: Currency) -> PortfolioSummary {
        PortfolioSummary {
            base_currency: currency,
            total_value: dec(total),
            crypto_value: dec(total),
            equities_value: Decimal::ZERO,
            cash_value: Decimal::ZERO,
            stablecoin_value: Decimal::ZERO,
            allocation: Allocation::default(),
            change_24h_percent: Decimal::ZERO,
        }
    }

    #[test]
    fn change_since_previous_snapshot() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let previous = SummarySnapshot::capture(&summary("1000", Currency::Usd), at);

        let change = change_since(&previous, &summary("1250", Currency::Usd)).unwrap();
        assert_eq!(change.absolute, dec("250"));
        assert_eq!(change.percent, dec("25"));
        assert_eq!(change.since, at);
    }

    #[test]
    fn now_stamps_current_time() {
        let before = Utc::now();
        let snapshot = SummarySnapshot::now(&summary("1000", Currency::Eur));
        assert!(snapshot.taken_at >= before && snapshot.taken_at <= Utc::now());
        assert_eq!(snapshot.base_currency, Currency::Eur);
        assert_eq!(snapshot.total_value, dec("1000"));
    }

    #[test]
    fn currency_mismatch_has_no_change() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let previous = SummarySnapshot::capture(&summary("1000", Currency::Usd), at);
        assert!(change_since(&previous, &summary("900", Currency::Eur)).is_none());
    }

    #[test]
    fn change_from_zero_is_zero_percent() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let previous = SummarySnapshot::capture(&summary("0", Currency::Usd), at);
        let change = change_since(&previous, &summary("10", Currency::Usd)).unwrap();
        assert_eq!(change.absolute, dec("10"));
        assert_eq!(change.percent, Decimal::ZERO);
    }

    #[test]
    fn trailing_window_picks_latest_old_enough_snapshot() {
        let day = |d: u32| Utc.with_ymd_and_hms(2024, 6, d, 12, 0, 0).unwrap();
        let snapshots = vec![
            SummarySnapshot::capture(&summary("800", Currency::Usd), day(1)),
            SummarySnapshot::capture(&summary("1000", Currency::Usd), day(3)),
            SummarySnapshot::capture(&summary("1100", Currency::Usd), day(9)),
        ];

        let change = change_over(
            &snapshots,
            &summary("1200", Currency::Usd),
            day(10),
            Duration::days(7),
        )
        .unwrap();
        assert_eq!(change.since, day(3));
        assert_eq!(change.absolute, dec("200"));

        assert!(change_over(
            &snapshots,
            &summary("1200", Currency::Usd),
            day(10),
            Duration::days(30)
        )
        .is_none());
    }
}
