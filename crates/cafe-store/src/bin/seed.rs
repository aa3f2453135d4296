//! # Sample Store Generator
//!
//! Builds a store from the config, loads the sample catalog, and prints the
//! result as JSON. Handy for checking a `store.toml` and for feeding screens
//! during development.
//!
//! ## Usage
//! ```bash
//! # Default config lookup ($CAFE_CONFIG, then the platform config dir)
//! cargo run -p cafe-store --bin seed
//!
//! # Explicit config file
//! cargo run -p cafe-store --bin seed -- --config ./store.toml
//!
//! # Write the effective config back out
//! cargo run -p cafe-store --bin seed -- --save-config ./store.toml
//!
//! # Summary only, no JSON dump
//! cargo run -p cafe-store --bin seed -- --quiet
//! ```

use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cafe_store::seed::build_store;
use cafe_store::StoreConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cafe=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut save_path: Option<PathBuf> = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--save-config" | "-s" => {
                if i + 1 < args.len() {
                    save_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--quiet" | "-q" => quiet = true,
            "--help" | "-h" => {
                println!("Cafe POS Sample Store Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>       store.toml to load (default: $CAFE_CONFIG or platform dir)");
                println!("  -s, --save-config <PATH>  Write the effective config to PATH");
                println!("  -q, --quiet               Print the summary only");
                println!("  -h, --help                Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    init_tracing();

    let config = StoreConfig::load(config_path)?;
    if let Some(path) = save_path {
        config.save(Some(path))?;
    }

    let store = build_store(&config)?;
    let stats = store.dashboard_stats_today();
    let tables = store.table_summary();

    eprintln!("{}", config.store.name);
    eprintln!("================================");
    eprintln!("Tables:      {} ({} seats)", tables.total, config.tables.seats.iter().sum::<u32>());
    eprintln!("Menu items:  {}", store.menu_items().len());
    eprintln!("Stock items: {} ({} low)", store.inventory().len(), stats.low_stock_items);
    eprintln!("Recipes:     {}", store.recipes().len());
    eprintln!("Tax rate:    {}%", config.tax_rate().percentage());
    eprintln!("Consumption: {}", config.inventory.consumption);
    eprintln!("Version:     {}", store.version());

    if !quiet {
        println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
    }

    Ok(())
}
