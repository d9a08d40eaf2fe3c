use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market_data::Currency;

/// A bank account balance, already denominated in its own currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    pub currency: Currency,
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apy: Option<Decimal>,
}

impl BankAccount {
    pub fn new(name: impl Into<String>, currency: Currency, balance: Decimal) -> Self {
        Self {
            name: name.into(),
            institution: None,
            currency,
            balance,
            apy: None,
        }
    }
}

/// Uninvested fiat sitting at an exchange or broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub location: String,
    pub currency: Currency,
    pub amount: Decimal,
}

impl Deposit {
    pub fn new(location: impl Into<String>, currency: Currency, amount: Decimal) -> Self {
        Self {
            location: location.into(),
            currency,
            amount,
        }
    }
}
