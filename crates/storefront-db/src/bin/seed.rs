//! # Seed Data Generator
//!
//! Populates the database with sample customers and products for
//! development.
//!
//! ## Usage
//! ```bash
//! # Default database path (./storefront_dev.db)
//! cargo run -p storefront-db --bin seed
//!
//! # Specify database path
//! cargo run -p storefront-db --bin seed -- --db ./data/storefront.db
//! ```

use chrono::Utc;
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use storefront_core::{Customer, Product};
use storefront_db::{CustomerRepository, Database, DbConfig, ProductRepository};

/// Sample catalog: (name, brand, size, category, price cents, stock).
const PRODUCTS: &[(&str, &str, Option<&str>, &str, i64, i64)] = &[
    ("Oxford Shirt Blue", "Harbor & Co", Some("L"), "Shirt", 2999, 40),
    ("Oxford Shirt White", "Harbor & Co", Some("M"), "Shirt", 2999, 35),
    ("Slim Jeans", "Denim Works", Some("32/32"), "Jeans", 4950, 25),
    ("Relaxed Jeans", "Denim Works", Some("34/32"), "Jeans", 4950, 18),
    ("Wool Jumper", "North Knit", Some("XL"), "Knitwear", 6500, 12),
    ("Canvas Belt", "Harbor & Co", None, "Accessories", 1500, 60),
    ("Leather Wallet", "Tanner's", None, "Accessories", 3500, 22),
    ("Chino Shorts", "Denim Works", Some("32"), "Shorts", 2750, 30),
    ("Rain Jacket", "North Knit", Some("L"), "Outerwear", 8900, 8),
    ("Baseball Cap", "Harbor & Co", None, "Accessories", 1200, 50),
];

/// Sample customers: (name, phone, email).
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Maria Ortiz", "555-0101", "maria.ortiz@example.com"),
    ("James Lee", "555-0102", "james.lee@example.com"),
    ("Fatima Khan", "555-0103", "fatima.khan@example.com"),
    ("Tom Becker", "555-0104", "tom.becker@example.com"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./storefront_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./storefront_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Storefront Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let mut conn = db.acquire().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&mut *conn)
        .await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    for (name, phone, email) in CUSTOMERS {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: (*name).to_string(),
            phone: Some((*phone).to_string()),
            email: (*email).to_string(),
            address: None,
            created_at: now,
        };
        CustomerRepository::insert(&mut conn, &customer).await?;
    }
    println!("✓ Seeded {} customers", CUSTOMERS.len());

    for (name, brand, size, category, price_cents, stock) in PRODUCTS {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: (*name).to_string(),
            brand: (*brand).to_string(),
            size: size.map(str::to_string),
            category: (*category).to_string(),
            description: None,
            price_cents: *price_cents,
            stock_quantity: *stock,
            created_at: now,
            updated_at: now,
        };
        ProductRepository::insert(&mut conn, &product).await?;
    }
    println!("✓ Seeded {} products", PRODUCTS.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
