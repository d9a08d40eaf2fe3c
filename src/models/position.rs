use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quantity of an asset held at one location (wallet, broker, bank).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Display name of the holding location
    pub location: String,
    pub quantity: Decimal,
    /// Yield rate in percent, when the location pays one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apy: Option<Decimal>,
}

impl Position {
    pub fn new(location: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            location: location.into(),
            quantity,
            apy: None,
        }
    }
}
