//! # Seed Data Loader
//!
//! Loads the fallback constants and a sample catalog + quotation.
//!
//! ## Usage
//! ```bash
//! # Insert missing constants and sample data
//! cargo run -p barra-db --bin seed
//!
//! # Overwrite existing constants with the defaults
//! cargo run -p barra-db --bin seed -- --force
//!
//! # Show what would be written
//! cargo run -p barra-db --bin seed -- --dry-run --db ./data/barra.db
//! ```

use barra_core::{BarOption, BarRates, CategorySelection, Climate, CostKey, Money};
use barra_db::repository::constants::describe_key;
use barra_db::{Database, DbConfig, Quotation};
use rust_decimal::Decimal;
use std::env;

/// Sample catalog: (name, unit, unit cost in units, yield)
const SAMPLE_CATALOG: &[(&str, &str, i64, i64)] = &[
    ("Hielo Bolsa 20kg", "bolsa", 90, 1),
    ("Refresco Cola 2L (paquete 8)", "paquete", 176, 8),
    ("Agua Natural Garrafón", "garrafón", 40, 4),
    ("Tequila Tradicional 950ml", "botella", 380, 1),
    ("Whisky Black Label 750ml", "botella", 1150, 1),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./barra_dev.db");
    let mut force = false;
    let mut dry_run = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--dry-run" | "-n" => dry_run = true,
            "--help" | "-h" => {
                println!("Barra Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./barra_dev.db)");
                println!("  -f, --force        Overwrite existing constants with defaults");
                println!("  -n, --dry-run      Show what would be written, write nothing");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Barra Seed Data Loader");
    println!("=========================");
    println!("Database: {}", db_path);
    if dry_run {
        println!("Mode: dry run");
    }
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");
    println!();

    // -------------------------------------------------------------------------
    // Fallback constants
    // -------------------------------------------------------------------------
    println!("Fallback constants:");
    let constants = db.constants();
    let (mut written, mut kept) = (0, 0);

    for key in CostKey::ALL {
        let name = key.constant_key();
        let value = key.default_cost().to_decimal();
        let existing = constants.get(name).await?;

        match (&existing, force, dry_run) {
            (Some(current), false, _) => {
                println!("  = {} keeps {}", name, current.value);
                kept += 1;
            }
            (_, _, true) => {
                println!("  ~ {} would be set to {}", name, value);
                written += 1;
            }
            (_, true, false) => {
                constants.upsert(name, value, Some(describe_key(key))).await?;
                println!("  ✓ {} = {}", name, value);
                written += 1;
            }
            (None, false, false) => {
                constants
                    .insert_if_absent(name, value, Some(describe_key(key)))
                    .await?;
                println!("  ✓ {} = {}", name, value);
                written += 1;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Sample catalog + quotation
    // -------------------------------------------------------------------------
    println!();
    let catalog = db.catalog();
    let existing_items = catalog.count().await?;
    if existing_items > 0 {
        println!("⚠ Catalog already has {} items, skipping sample data", existing_items);
    } else if dry_run {
        println!("Would create {} catalog items and one sample quotation", SAMPLE_CATALOG.len());
    } else {
        let mut ids = Vec::with_capacity(SAMPLE_CATALOG.len());
        for (name, unit, cost, yield_factor) in SAMPLE_CATALOG {
            let item = catalog
                .create(name, unit, Money::from_units(*cost), Decimal::from(*yield_factor))
                .await?;
            println!("  ✓ {} ({})", item.name, item.unit_cost());
            ids.push(item.id);
        }

        let mut quotation =
            Quotation::new("Evento de ejemplo", 100, 5, Climate::Hot, Decimal::new(13, 1));
        quotation.categories =
            CategorySelection::from_options(&[BarOption::Beer, BarOption::NationalLiquor]);
        quotation.supply_items.ice = ids.first().cloned();
        quotation.supply_items.soft_drink = ids.get(1).cloned();
        db.quotations().insert(&quotation).await?;

        let outcome = db.bar_lines(BarRates::default()).sync(&quotation.id).await?;
        println!();
        println!("✓ Sample quotation {}", quotation.id);
        if let Some(estimate) = outcome.estimate {
            println!("  Suggested bar price: {}", estimate.suggested_price);
        }
    }

    println!();
    println!("📊 Summary");
    println!("   Constants written: {}", written);
    println!("   Constants kept:    {}", kept);
    if dry_run {
        println!();
        println!("🔍 Dry run: nothing was written. Run without --dry-run to apply.");
    } else {
        println!();
        println!("✓ Seed complete!");
    }

    Ok(())
}
