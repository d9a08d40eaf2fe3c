use rust_decimal::Decimal;

use crate::models::Position;

/// Total quantity held across every position of one asset.
pub fn total_quantity(positions: &[Position]) -> Decimal {
    positions.iter().map(|p| p.quantity).sum()
}
