use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{Asset, AssetKind, BankAccount, Deposit};
use crate::market_data::Currency;

/// One portfolio's raw holdings, as read from the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Holdings {
    pub assets: Vec<Asset>,
    pub bank_accounts: Vec<BankAccount>,
    pub exchange_deposits: Vec<Deposit>,
    pub broker_deposits: Vec<Deposit>,
}

impl Holdings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load holdings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read holdings file: {}", path.display()))?;
        let holdings: Holdings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse holdings file: {}", path.display()))?;
        Ok(holdings)
    }

    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn with_bank_account(mut self, account: BankAccount) -> Self {
        self.bank_accounts.push(account);
        self
    }

    pub fn with_exchange_deposit(mut self, deposit: Deposit) -> Self {
        self.exchange_deposits.push(deposit);
        self
    }

    pub fn with_broker_deposit(mut self, deposit: Deposit) -> Self {
        self.broker_deposits.push(deposit);
        self
    }

    pub fn crypto_assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets
            .iter()
            .filter(|a| matches!(a.kind, AssetKind::Crypto { .. }))
    }

    pub fn equity_assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets
            .iter()
            .filter(|a| matches!(a.kind, AssetKind::Equity { .. }))
    }

    /// Exchange deposits followed by broker deposits.
    pub fn deposits(&self) -> impl Iterator<Item = &Deposit> {
        self.exchange_deposits
            .iter()
            .chain(self.broker_deposits.iter())
    }

    /// Currencies that need an FX rate to value these holdings.
    ///
    /// Crypto is quoted directly in the base currency, so only equities and
    /// cash contribute.
    pub fn fx_currencies(&self) -> BTreeSet<Currency> {
        self.equity_assets()
            .map(|a| a.currency)
            .chain(self.bank_accounts.iter().map(|b| b.currency))
            .chain(self.deposits().map(|d| d.currency))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
            && self.bank_accounts.is_empty()
            && self.exchange_deposits.is_empty()
            && self.broker_deposits.is_empty()
    }
}
