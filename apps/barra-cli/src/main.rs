//! # Barra CLI
//!
//! ```text
//! barra estimate --guests 100 --hours 5 --climate hot --beer --national
//! barra estimate --guests 80 --premium --premium-cocktails --shopping-list
//! barra sync --quotation 3f2b...
//! barra constants
//! ```
//!
//! Estimates and sync outcomes are printed as JSON on stdout. Logs go to
//! stderr and follow `RUST_LOG`.

mod config;
mod error;

use barra_core::{
    BarCostEstimator, BarOption, Climate, CostCatalog, CostKey, EmptyCatalog,
    EventBarConfiguration, ShoppingList,
};
use barra_db::{Database, DbConfig, DbResult};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use error::CliResult;

#[derive(Parser, Debug)]
#[command(name = "barra", version, about = "Bar service cost estimator")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides the config file and BARRA_DB_PATH
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the bar for an event described on the command line
    Estimate(EstimateArgs),

    /// Recompute the bar line of a stored quotation
    Sync {
        #[arg(short, long)]
        quotation: String,
    },

    /// Show the fallback constants and the value the estimator will use
    Constants,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    #[arg(short, long)]
    guests: i64,

    #[arg(long, default_value_t = 5)]
    hours: i64,

    /// hot, cool or extreme
    #[arg(long, default_value = "cool")]
    climate: Climate,

    /// Multiplier from total cost to suggested price
    #[arg(long, default_value = "1.3")]
    factor: Decimal,

    #[arg(long)]
    soft_drinks: bool,
    #[arg(long)]
    beer: bool,
    #[arg(long)]
    national: bool,
    #[arg(long)]
    premium: bool,
    #[arg(long)]
    basic_cocktails: bool,
    #[arg(long)]
    premium_cocktails: bool,

    /// Also print the per-product shopping list
    #[arg(long)]
    shopping_list: bool,

    /// Use the built-in fallback costs without opening the database
    #[arg(long)]
    no_db: bool,
}

impl EstimateArgs {
    fn options(&self) -> Vec<BarOption> {
        let flags = [
            self.soft_drinks,
            self.beer,
            self.national,
            self.premium,
            self.basic_cocktails,
            self.premium_cocktails,
        ];
        BarOption::ALL
            .into_iter()
            .zip(flags)
            .filter_map(|(option, on)| on.then_some(option))
            .collect()
    }

    fn configuration(&self) -> EventBarConfiguration {
        EventBarConfiguration::new(self.guests, self.hours, self.climate, self.factor)
            .with_options(&self.options())
    }
}

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,barra=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = AppConfig::load(cli.config)?;
    if let Some(path) = cli.db {
        config.database.path = path;
    }
    debug!(db = ?config.database.path, "Configuration loaded");

    match cli.command {
        Command::Estimate(args) => estimate(&config, &args).await,
        Command::Sync { quotation } => {
            let db = open(&config).await?;
            let sync = db.bar_lines(config.rates.clone());
            let outcome = closing(&db, sync.sync(&quotation)).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Command::Constants => constants(&config).await,
    }
}

async fn open(config: &AppConfig) -> CliResult<Database> {
    Ok(Database::new(DbConfig::new(&config.database.path)).await?)
}

/// Runs `work`, then closes the pool whether it succeeded or not.
async fn closing<T>(db: &Database, work: impl Future<Output = DbResult<T>>) -> CliResult<T> {
    let result = work.await;
    db.close().await;
    Ok(result?)
}

async fn estimate(config: &AppConfig, args: &EstimateArgs) -> CliResult<()> {
    let event = args.configuration();

    let estimate = if args.no_db {
        BarCostEstimator::new(config.rates.clone(), EmptyCatalog).estimate(&event)
    } else {
        let db = open(config).await?;
        let snapshot = closing(&db, db.constants().load_snapshot()).await?;
        BarCostEstimator::new(config.rates.clone(), snapshot).estimate(&event)
    };

    let Some(estimate) = estimate else {
        println!("no estimate: enable at least one option and a positive guest count");
        return Ok(());
    };

    let output = if args.shopping_list {
        let list = ShoppingList::build(&estimate, &config.template);
        serde_json::json!({ "estimate": estimate, "shopping_list": list })
    } else {
        serde_json::to_value(&estimate)?
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn constants(config: &AppConfig) -> CliResult<()> {
    let db = open(config).await?;
    let snapshot = closing(&db, db.constants().load_snapshot()).await?;

    println!("{:<22} {:>12}  source", "key", "value");
    for key in CostKey::ALL {
        let name = key.constant_key();
        let source = if snapshot.fallback_constant(name).is_some() {
            "stored"
        } else {
            "default"
        };
        let value = key.resolve(&snapshot, None).normalize().to_string();
        println!("{:<22} {:>12}  {}", name, value, source);
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use barra_core::{BarRates, CategorySelection};
    use barra_db::DbError;

    #[test]
    fn test_estimate_flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "barra", "estimate", "--guests", "100", "--climate", "hot", "--beer", "--national",
        ])
        .unwrap();

        let Command::Estimate(args) = cli.command else {
            panic!("expected estimate");
        };
        let event = args.configuration();
        assert_eq!(event.guest_count, 100);
        assert_eq!(event.service_hours, 5);
        assert_eq!(event.climate, Climate::Hot);
        assert_eq!(event.profit_factor, Decimal::new(13, 1));
        assert_eq!(
            event.categories,
            CategorySelection::from_options(&[BarOption::Beer, BarOption::NationalLiquor])
        );
    }

    #[test]
    fn test_estimate_without_db_matches_reference_event() {
        let cli = Cli::try_parse_from([
            "barra", "estimate", "-g", "100", "--climate", "calor", "--beer", "--national", "--no-db",
        ])
        .unwrap();
        let Command::Estimate(args) = cli.command else {
            panic!("expected estimate");
        };

        let estimate = BarCostEstimator::new(AppConfig::default().rates, EmptyCatalog)
            .estimate(&args.configuration())
            .unwrap();
        assert_eq!(estimate.suggested_price, barra_core::Money::from_cents(2_694_120));
    }

    #[test]
    fn test_unknown_climate_is_rejected() {
        let result = Cli::try_parse_from(["barra", "estimate", "-g", "50", "--climate", "tropical"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sync_requires_quotation() {
        assert!(Cli::try_parse_from(["barra", "sync"]).is_err());

        let cli = Cli::try_parse_from(["barra", "--db", "/tmp/x.db", "sync", "-q", "abc"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(cli.command, Command::Sync { quotation } if quotation == "abc"));
    }

    #[tokio::test]
    async fn test_failed_sync_still_closes_pool() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sync = db.bar_lines(BarRates::default());

        let result = closing(&db, sync.sync("missing")).await;

        assert!(matches!(result, Err(CliError::Db(DbError::NotFound { .. }))));
        assert!(db.pool().is_closed());
    }

    #[tokio::test]
    async fn test_successful_work_closes_pool() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let snapshot = closing(&db, db.constants().load_snapshot()).await.unwrap();

        assert!(snapshot.is_empty());
        assert!(db.pool().is_closed());
    }
}
