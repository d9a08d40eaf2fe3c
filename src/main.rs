use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tallybook::config::{default_config_path, Config};
use tallybook::format::{format_money, format_percent};
use tallybook::market_data::{Currency, ManualPrices, StaticMarketData};
use tallybook::models::Holdings;
use tallybook::portfolio::{
    build_breakdown, merge_listings, sort_listings, ListingRow, PortfolioService,
    PortfolioValuation, SortDirection, SortKey,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "tallybook")]
#[command(about = "Value and compare multi-currency portfolios")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base currency for the report (overrides config)
    #[arg(short, long)]
    base: Option<Currency>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct MarketArgs {
    /// JSON market snapshot with quotes and FX rates
    #[arg(short, long)]
    market: PathBuf,

    /// JSON object of manual prices keyed by ticker
    #[arg(long)]
    manual_prices: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Total value, per-class values, allocation and 24h change
    Summary {
        /// JSON holdings file
        holdings: PathBuf,
        #[command(flatten)]
        market: MarketArgs,
    },
    /// Per-class breakdown entries
    Breakdown {
        holdings: PathBuf,
        #[command(flatten)]
        market: MarketArgs,
    },
    /// Equity listings merged by display ticker
    Listings {
        holdings: PathBuf,
        #[command(flatten)]
        market: MarketArgs,
        #[arg(long, value_enum, default_value_t = SortKey::Value)]
        sort: SortKey,
        #[arg(long, value_enum, default_value_t = SortDirection::Descending)]
        direction: SortDirection,
    },
    /// Compare two portfolios in one currency
    Compare {
        /// Holdings of the viewing user
        viewer: PathBuf,
        /// Holdings of the portfolio being viewed
        owner: PathBuf,
        #[command(flatten)]
        market: MarketArgs,
    },
    /// Show current configuration
    Config,
}

fn build_service(args: &MarketArgs) -> Result<PortfolioService> {
    let market = Arc::new(StaticMarketData::load(&args.market)?);
    let service = PortfolioService::new(market.clone(), market);
    match &args.manual_prices {
        Some(path) => Ok(service.with_overrides(Arc::new(ManualPrices::load(path)?))),
        None => Ok(service),
    }
}

async fn value(holdings: &Path, market: &MarketArgs, base: Currency) -> Result<PortfolioValuation> {
    let holdings = Holdings::load(holdings)?;
    build_service(market)?.value(&holdings, base).await
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load tallybook config: {}", config_path.display()))?;
    let base = cli.base.unwrap_or(config.base_currency);

    match cli.command {
        Command::Summary { holdings, market } => {
            let valuation = value(&holdings, &market, base).await?;
            let summary = &valuation.summary;
            let money = |v| format_money(v, base, &config.display);
            print_json(&json!({
                "summary": summary,
                "display": {
                    "total": money(summary.total_value),
                    "crypto": money(summary.crypto_value),
                    "equities": money(summary.equities_value),
                    "cash": money(summary.cash_value),
                    "change_24h": format_percent(summary.change_24h_percent, 2),
                },
            }))?;
        }
        Command::Breakdown { holdings, market } => {
            let valuation = value(&holdings, &market, base).await?;
            print_json(&build_breakdown(&valuation, &config.breakdown))?;
        }
        Command::Listings {
            holdings,
            market,
            sort,
            direction,
        } => {
            let valuation = value(&holdings, &market, base).await?;
            let rows = valuation
                .equities
                .assets
                .iter()
                .map(ListingRow::from_valuation)
                .collect();
            let mut entries = merge_listings(rows);
            sort_listings(&mut entries, sort, direction);
            print_json(&entries)?;
        }
        Command::Compare {
            viewer,
            owner,
            market,
        } => {
            let viewer = Holdings::load(&viewer)?;
            let owner = Holdings::load(&owner)?;
            let comparison = build_service(&market)?
                .compare(&viewer, &owner, base)
                .await?;
            print_json(&json!({
                "comparison": comparison,
                "overlap_ratio": comparison.overlap_ratio(),
                "shared": comparison.shared().count(),
                "viewer_only": comparison.viewer_only().count(),
                "owner_only": comparison.owner_only().count(),
            }))?;
        }
        Command::Config => {
            println!("Config file: {}", config_path.display());
            println!("Base currency: {base}");
            println!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to render config")?
            );
        }
    }

    Ok(())
}
