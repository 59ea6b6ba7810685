//! # Seed Data Generator
//!
//! Populates the database with sample items for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 items (default)
//! cargo run -p vault-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p vault-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p vault-db --bin seed -- --db ./data/vault.db
//! ```
//!
//! Items are spread over a handful of categories, each with its own brands
//! and price band, and purchase dates walk backwards from 2024-12-31.

use std::env;

use chrono::{Duration, NaiveDate};
use vault_core::{Item, NewItem, DATE_FORMAT};
use vault_db::{Database, DbConfig, RequestContext};

/// Category → (brands, models, base price)
const CATALOG: &[(&str, &[&str], &[&str], i64)] = &[
    (
        "Watch",
        &["ROLEX", "Omega", "Cartier", "Patek Philippe", "Grand Seiko"],
        &["Submariner", "Speedmaster", "Santos", "Calatrava", "Snowflake"],
        800_000,
    ),
    (
        "Bag",
        &["Chanel", "Hermes", "Louis Vuitton", "Celine"],
        &["Classic Flap", "Birkin 30", "Neverfull MM", "Luggage Nano"],
        300_000,
    ),
    (
        "Jewelry",
        &["Tiffany", "Van Cleef", "Bulgari"],
        &["Solitaire Ring", "Alhambra Necklace", "Serpenti Bracelet"],
        150_000,
    ),
    (
        "Shoes",
        &["Berluti", "John Lobb", "Christian Louboutin"],
        &["Alessandro", "City II", "So Kate"],
        90_000,
    ),
];

const DEFAULT_COUNT: usize = 200;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = DEFAULT_COUNT;
    let mut db_path = String::from("./vault_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(DEFAULT_COUNT);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Vault Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: {DEFAULT_COUNT})");
                println!("  -d, --db <PATH>    Database file path (default: ./vault_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Vault Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let ctx = RequestContext::background();
    let items = db.items();

    println!("✓ Connected to database");
    println!("✓ Schema bootstrapped");

    let existing = items.count(&ctx).await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating items...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let item = generate_item(seed)?;
        if let Err(e) = items.insert(&ctx, &item).await {
            eprintln!("Failed to insert {}: {}", item.name, e);
            continue;
        }

        generated += 1;
        if generated % 100 == 0 {
            println!("  Generated {} items...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} items in {:?}", generated, elapsed);

    println!();
    println!("Category totals:");
    let all = items.find_all(&ctx).await?;
    let summary = vault_core::CategorySummary::from_items(&all);
    for (category, stats) in &summary.categories {
        println!(
            "  {:<10} {:>5} items  {:>14}",
            category, stats.count, stats.total_price
        );
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single item with realistic data.
fn generate_item(seed: usize) -> Result<NewItem, Box<dyn std::error::Error>> {
    let (category, brands, models, base_price) = CATALOG[seed % CATALOG.len()];
    let brand = brands[(seed / CATALOG.len()) % brands.len()];
    let model = models[(seed * 7) % models.len()];

    // Base price plus up to 75% on top
    let price = base_price + base_price * ((seed * 37) % 76) as i64 / 100;

    let last_day = NaiveDate::from_ymd_opt(2024, 12, 31).ok_or("invalid seed start date")?;
    let date = last_day - Duration::days(((seed * 13) % 1500) as i64);

    let name = format!("{} {} #{:04}", brand, model, seed);
    Ok(Item::new(
        name,
        category,
        brand,
        price,
        &date.format(DATE_FORMAT).to_string(),
    )?)
}
