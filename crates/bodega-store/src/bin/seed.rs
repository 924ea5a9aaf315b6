//! # Seed Data Generator
//!
//! Populates the data store with demo bodega products for development.
//!
//! ## Usage
//! ```bash
//! # Seed every demo product into http://localhost:3000
//! cargo run -p bodega-store --bin seed
//!
//! # Only the first 10 products
//! cargo run -p bodega-store --bin seed -- --count 10
//!
//! # Another store, plus a couple of fiado customers
//! cargo run -p bodega-store --bin seed -- --url http://127.0.0.1:4000 --customers
//! ```
//!
//! ## Generated Products
//! Each product is built from a purchase batch through the same form rules
//! the dashboard uses:
//! - `packages × unitsPerPackage` units in stock
//! - unit cost = package cost / units per package
//! - sale price = unit cost plus a fixed margin

use std::env;
use std::time::Instant;

use bodega_core::inventory::{PackagePlan, ProductForm};
use bodega_core::ledger::{open_account, CustomerForm};
use bodega_core::{Currency, Money, ProductSnapshot};
use bodega_store::{Store, StoreConfig, DEFAULT_STORE_URL};
use rust_decimal::Decimal;

/// (name, packages, units per package, package cost, margin per unit) in COP.
const PRODUCTS: &[(&str, i64, i64, i64, i64)] = &[
    ("Harina PAN 1kg", 2, 20, 60_000, 800),
    ("Arroz Diana 500g", 3, 25, 62_500, 500),
    ("Aceite Premier 1L", 1, 12, 108_000, 1_500),
    ("Azúcar Manuelita 1kg", 2, 20, 76_000, 700),
    ("Café Sello Rojo 250g", 2, 12, 84_000, 1_200),
    ("Leche Alquería 1L", 4, 6, 22_800, 600),
    ("Huevos AA x30", 5, 1, 16_500, 2_500),
    ("Pasta Doria 250g", 2, 24, 43_200, 400),
    ("Atún Van Camps 175g", 1, 24, 132_000, 1_000),
    ("Coca-Cola 1.5L", 3, 6, 27_000, 900),
    ("Pan tajado Bimbo", 2, 10, 48_000, 900),
    ("Queso campesino 500g", 1, 10, 85_000, 1_500),
    ("Jabón Rey x3", 2, 12, 54_000, 800),
    ("Papel higiénico Familia x4", 2, 12, 96_000, 1_200),
    ("Chocolatina Jet", 5, 24, 19_200, 300),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = PRODUCTS.len();
    let mut url = String::from(DEFAULT_STORE_URL);
    let mut with_customers = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(PRODUCTS.len());
                    i += 1;
                }
            }
            "--url" | "-u" => {
                if i + 1 < args.len() {
                    url = args[i + 1].clone();
                    i += 1;
                }
            }
            "--customers" => with_customers = true,
            "--help" | "-h" => {
                println!("Bodega POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  -c, --count <N>    Number of products to create (default: {})",
                    PRODUCTS.len()
                );
                println!("  -u, --url <URL>    Store base URL (default: {})", DEFAULT_STORE_URL);
                println!("      --customers    Also create demo fiado customers");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bodega POS Seed Data Generator");
    println!("=================================");
    println!("Store:    {}", url);
    println!("Products: {}", count.min(PRODUCTS.len()));
    println!();

    let store = Store::new(StoreConfig::new(&url))?;
    if !store.health_check().await {
        println!("⚠ Store at {} is not answering", url);
        println!("  Start it with: npx json-server db.json --port 3000");
        return Ok(());
    }
    println!("✓ Connected to store");

    // Check existing products
    let existing = store.products().list().await?;
    if !existing.is_empty() {
        println!("⚠ Store already has {} products", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Empty the products collection to regenerate.");
        return Ok(());
    }

    println!();
    println!("Creating products...");

    let start = Instant::now();
    let mut created = Vec::new();

    for &(name, packages, units, package_cost, margin) in PRODUCTS.iter().take(count) {
        let form = demo_form(name, packages, units, package_cost, margin);
        let product = match form.build_new() {
            Ok(product) => product,
            Err(e) => {
                eprintln!("Skipping {}: {}", name, e);
                continue;
            }
        };

        match store.products().insert(&product).await {
            Ok(stored) => {
                println!("  {} ({} units @ {})", stored.name, stored.stock, stored.price);
                created.push(stored);
            }
            Err(e) => eprintln!("Failed to insert {}: {}", name, e),
        }
    }

    println!();
    println!("✓ Created {} products in {:?}", created.len(), start.elapsed());

    if with_customers && created.len() >= 2 {
        println!();
        println!("Creating fiado customers...");

        let forms = [
            CustomerForm {
                name: "Doña Carmen".to_string(),
                currency: Currency::Cop,
                concept: None,
                lines: vec![
                    ProductSnapshot::of(&created[0], 2),
                    ProductSnapshot::of(&created[1], 1),
                ],
                amount: None,
            },
            CustomerForm {
                name: "Luis el taxista".to_string(),
                currency: Currency::Cop,
                concept: Some("Préstamo".to_string()),
                lines: Vec::new(),
                amount: Some(Money::from_int(20_000)),
            },
        ];

        for form in &forms {
            let customer = open_account(form)?;
            match store.customers().insert(&customer).await {
                Ok(stored) => println!("  {} owes {}", stored.name, customer.balance()),
                Err(e) => eprintln!("Failed to insert {}: {}", form.name, e),
            }
        }
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Purchase-batch form for one demo product.
fn demo_form(name: &str, packages: i64, units: i64, package_cost: i64, margin: i64) -> ProductForm {
    let (packages, units, package_cost) = (
        Decimal::from(packages),
        Decimal::from(units),
        Decimal::from(package_cost),
    );
    let unit_cost = PackagePlan::new(packages, units, package_cost)
        .map(|plan| plan.unit_cost())
        .unwrap_or_default();

    ProductForm {
        name: name.to_string(),
        price: Some(unit_cost + Money::from_int(margin)),
        stock: None,
        packages: Some(packages),
        unit_packages: Some(units),
        package_cost: Some(package_cost),
        currency: Currency::Cop,
        image: None,
        url_image: None,
    }
}
