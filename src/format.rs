use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::DisplayConfig;
use crate::market_data::Currency;

fn round_half_away(value: Decimal, dp: Option<u32>) -> Decimal {
    match dp {
        Some(dp) => value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        None => value,
    }
}

/// Canonical string form of a money value: optionally rounded, trailing
/// zeros stripped.
pub fn format_value(value: Decimal, decimals: Option<u32>) -> String {
    round_half_away(value, decimals).normalize().to_string()
}

fn group_int_digits(int_part: &str) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        out.push(ch);
        let remaining = len.saturating_sub(i + 1);
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

fn pad_fraction_to_dp(s: &str, dp: u32) -> String {
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
    if dp == 0 {
        return int_part.to_string();
    }

    let mut frac: String = frac_part.chars().take(dp as usize).collect();
    while frac.len() < dp as usize {
        frac.push('0');
    }
    format!("{int_part}.{frac}")
}

fn group_number_string(s: &str) -> String {
    match s.split_once('.') {
        Some((int_part, frac)) if !frac.is_empty() => {
            format!("{}.{frac}", group_int_digits(int_part))
        }
        Some((int_part, _)) => group_int_digits(int_part),
        None => group_int_digits(s),
    }
}

/// Format a value in `currency` for human display.
///
/// Uses the display settings for rounding, grouping and padding. The symbol
/// is the configured one, else the currency's own, else the ISO code
/// as a suffix.
pub fn format_money(value: Decimal, currency: Currency, display: &DisplayConfig) -> String {
    let rounded = round_half_away(value, display.currency_decimals);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let mut s = rounded.abs().normalize().to_string();
    if display.currency_fixed_decimals {
        if let Some(dp) = display.currency_decimals {
            s = pad_fraction_to_dp(&s, dp);
        }
    }
    if display.currency_grouping {
        s = group_number_string(&s);
    }

    let sign = if negative { "-" } else { "" };
    match display.symbol_for(currency) {
        Some(symbol) => format!("{sign}{symbol}{s}"),
        None => format!("{sign}{s} {}", currency.code()),
    }
}

/// Percent (0-100 scale) rounded to `dp` places with an explicit sign.
pub fn format_percent(percent: Decimal, dp: u32) -> String {
    let rounded = round_half_away(percent, Some(dp));
    let body = pad_fraction_to_dp(&rounded.abs().normalize().to_string(), dp);
    if rounded.is_zero() {
        format!("{body}%")
    } else if rounded.is_sign_negative() {
        format!("-{body}%")
    } else {
        format!("+{body}%")
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
    fn value_strips_trailing_zeros() {
        assert_eq!(format_value(dec("1234.500"), None), "1234.5");
        assert_eq!(format_value(dec("2.345"), Some(2)), "2.35");
    }

    #[test]
    fn money_groups_and_pads() {
        let display = DisplayConfig {
            currency_decimals: Some(2),
            currency_grouping: true,
            currency_symbol: None,
            currency_fixed_decimals: true,
        };
        assert_eq!(format_money(dec("1234567.5"), Currency::Usd, &display), "$1,234,567.50");
        assert_eq!(format_money(dec("-1234.5"), Currency::Usd, &display), "-$1,234.50");
    }

    #[test]
    fn money_without_symbol_uses_code_suffix() {
        let display = DisplayConfig::default();
        assert_eq!(format_money(dec("10"), Currency::Chf, &display), "10 CHF");
    }

    #[test]
    fn grouping_keeps_whole_numbers_whole() {
        let display = DisplayConfig {
            currency_grouping: true,
            ..Default::default()
        };
        assert_eq!(format_money(dec("1000000"), Currency::Eur, &display), "€1,000,000");
    }

    #[test]
    fn percent_is_signed() {
        assert_eq!(format_percent(dec("2.345"), 2), "+2.35%");
        assert_eq!(format_percent(dec("-0.5"), 1), "-0.5%");
        assert_eq!(format_percent(Decimal::ZERO, 2), "0.00%");
    }
}
