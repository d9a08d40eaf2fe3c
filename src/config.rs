use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::market_data::Currency;
use crate::portfolio::BreakdownOptions;

/// Display/output formatting configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// If set, base-currency values are rounded to this many decimal places
    /// before being rendered.
    ///
    /// This is purely a presentation setting and does not affect calculations.
    pub currency_decimals: Option<u32>,

    /// Render base-currency values with thousands separators.
    pub currency_grouping: bool,

    /// Overrides the base currency's own symbol.
    pub currency_symbol: Option<String>,

    /// When true and `currency_decimals` is set, pad with trailing zeros to
    /// exactly that many decimal places.
    pub currency_fixed_decimals: bool,
}

impl DisplayConfig {
    /// Symbol to prefix values with: the configured one, else the currency's.
    pub fn symbol_for(&self, currency: Currency) -> Option<&str> {
        self.currency_symbol.as_deref().or_else(|| currency.symbol())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Currency every report is expressed in.
    pub base_currency: Currency,

    pub display: DisplayConfig,

    pub breakdown: BreakdownOptions,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("tallybook.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("tallybook").join("tallybook.toml");
    }

    local_config
}
