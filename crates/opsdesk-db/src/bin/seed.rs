//! # Seed Data Generator
//!
//! Populates a development database with products, orders and a few cash
//! movements.
//!
//! ## Usage
//! ```bash
//! # 40 products, 200 orders (default)
//! cargo run -p opsdesk-db --bin seed
//!
//! # Custom amounts
//! cargo run -p opsdesk-db --bin seed -- --products 10 --orders 1000
//!
//! # Load products and expenses from a JSON fixture instead
//! cargo run -p opsdesk-db --bin seed -- --fixture ./fixtures/shop.json
//!
//! # Specify database path
//! cargo run -p opsdesk-db --bin seed -- --db ./data/opsdesk.db
//! ```
//!
//! ## Generated Data
//! - Products: kitchen gadgets in size variants, stock 20 - 80
//! - Orders: spread over the last 60 days, mixed statuses, each one
//!   decrementing stock like a real order
//! - Cash: courier payouts (cash-in) and ad spend (cash-out, mirrored to
//!   expenses)

use chrono::{Duration, Utc};
use serde::Deserialize;
use std::env;
use std::path::Path;

use opsdesk_core::cash::{CashEntry, ExpenseDraft};
use opsdesk_core::inventory::ProductDraft;
use opsdesk_core::order::OrderDraft;
use opsdesk_core::{CashCategory, CashDirection, OrderStatus, PaymentMethod, Product};
use opsdesk_db::{Database, DbConfig};

/// Base catalogue: name and buy price in cents.
const GADGETS: &[(&str, i64)] = &[
    ("Vegetable Cutter", 10000),
    ("Push Chopper", 18000),
    ("Coffee Mixer", 6000),
    ("Garlic Press", 4500),
    ("Egg Separator", 2500),
    ("Silicone Spatula", 3000),
    ("Oil Sprayer", 5500),
    ("Rice Scoop", 1500),
    ("Dough Scraper", 2000),
    ("Spice Rack", 22000),
];

/// Size variants and their buy price add-on.
const SIZES: &[(&str, i64)] = &[("Mini", 0), ("Standard", 1500), ("Pro", 4000), ("Family", 6500)];

const CUSTOMERS: &[(&str, &str)] = &[
    ("Rahim Uddin", "Mirpur 10, Dhaka"),
    ("Karim Hasan", "Dhanmondi 27, Dhaka"),
    ("Salma Akter", "Agrabad, Chattogram"),
    ("Nusrat Jahan", "Zindabazar, Sylhet"),
    ("Tanvir Ahmed", "Uttara Sector 7, Dhaka"),
    ("Farzana Rahman", "Shaheb Bazar, Rajshahi"),
];

/// Status mix: mostly delivered, some still with the courier.
const STATUSES: &[OrderStatus] = &[
    OrderStatus::Delivered,
    OrderStatus::Delivered,
    OrderStatus::Delivered,
    OrderStatus::InTransit,
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::Returned,
    OrderStatus::Cancelled,
];

/// JSON fixture accepted by `--fixture`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SeedFixture {
    products: Vec<ProductDraft>,
    expenses: Vec<ExpenseDraft>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut product_count: usize = 40;
    let mut order_count: usize = 200;
    let mut db_path = String::from("./opsdesk_dev.db");
    let mut fixture: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--products" | "-p" => {
                if i + 1 < args.len() {
                    product_count = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--orders" | "-o" => {
                if i + 1 < args.len() {
                    order_count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--fixture" | "-f" => {
                if i + 1 < args.len() {
                    fixture = Some(args[i + 1].clone());
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
                println!("opsdesk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --products <N>    Number of products to generate (default: 40)");
                println!("  -o, --orders <N>      Number of orders to generate (default: 200)");
                println!("  -f, --fixture <PATH>  Load products and expenses from a JSON file");
                println!("  -d, --db <PATH>       Database file path (default: ./opsdesk_dev.db)");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 opsdesk Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    let products = match &fixture {
        Some(path) => load_fixture(&db, Path::new(path)).await?,
        None => generate_products(&db, product_count).await?,
    };
    println!("✓ {} products", products.len());

    if products.is_empty() {
        println!("  No products, skipping orders.");
        return Ok(());
    }

    println!();
    println!("Generating orders...");
    let mut created = 0;
    for seed in 0..order_count {
        let product = &products[seed % products.len()];
        if let Err(e) = db.orders().create(generate_order(product, seed)).await {
            eprintln!("Failed to create order {}: {}", seed, e);
            continue;
        }
        created += 1;
        if created % 100 == 0 {
            println!("  Created {} orders...", created);
        }
    }
    println!("✓ {} orders", created);

    for week in 0..4 {
        db.cash()
            .record(CashEntry {
                amount_cents: 500_000 + week * 25_000,
                direction: CashDirection::CashIn,
                category: CashCategory::CourierPayment,
                method: PaymentMethod::Bank,
                note: format!("Courier payout week {}", week + 1),
            })
            .await?;
        db.cash()
            .record(CashEntry {
                amount_cents: 150_000,
                direction: CashDirection::CashOut,
                category: CashCategory::MarketingAdCost,
                method: PaymentMethod::MobileWallet,
                note: "Facebook boost".to_string(),
            })
            .await?;
    }
    println!("✓ Cash ledger seeded");

    let elapsed = start.elapsed();
    let dashboard = db.reports().admin_dashboard().await?;

    println!();
    println!("Seeded in {:?}", elapsed);
    println!("  Net profit:      {}", dashboard.net_profit_cents);
    println!("  Inventory value: {}", dashboard.inventory_value_cents);
    println!("  Courier pending: {}", dashboard.courier_pending_cents);
    println!("  Wallet balance:  {}", dashboard.wallet_balance_cents);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

async fn load_fixture(db: &Database, path: &Path) -> Result<Vec<Product>, Box<dyn std::error::Error>> {
    println!("Loading fixture {}...", path.display());

    let raw = std::fs::read_to_string(path)?;
    let fixture: SeedFixture = serde_json::from_str(&raw)?;

    let mut products = Vec::with_capacity(fixture.products.len());
    for draft in fixture.products {
        products.push(db.products().create(draft).await?);
    }
    for draft in fixture.expenses {
        db.expenses().add(draft).await?;
    }

    Ok(products)
}

async fn generate_products(db: &Database, count: usize) -> Result<Vec<Product>, Box<dyn std::error::Error>> {
    println!("Generating products...");

    let mut products = Vec::with_capacity(count);
    'outer: for (gadget_idx, (name, buy_price)) in GADGETS.iter().enumerate() {
        for (size_idx, (size, addon)) in SIZES.iter().enumerate() {
            if products.len() >= count {
                break 'outer;
            }
            let seed = gadget_idx * SIZES.len() + size_idx;
            let buy = buy_price + addon;

            let product = db
                .products()
                .create(ProductDraft {
                    name: format!("{} {}", name, size),
                    buy_price_cents: buy,
                    // 30-60% markup
                    sell_price_cents: buy * (130 + (seed % 31) as i64) / 100,
                    stock: 20 + (seed * 7 % 61) as i64,
                })
                .await?;
            products.push(product);
        }
    }

    Ok(products)
}

/// Generates one order draft for `product` with realistic variation.
fn generate_order(product: &Product, seed: usize) -> OrderDraft {
    let (customer, address) = CUSTOMERS[seed % CUSTOMERS.len()];
    let days_ago = (seed * 13 % 60) as i64;

    OrderDraft {
        customer_name: customer.to_string(),
        phone: format!("017{:08}", seed % CUSTOMERS.len() * 1_111_111),
        address: address.to_string(),
        product_id: Some(product.id.clone()),
        // occasional discount off the list price
        sale_price_cents: (seed % 5 == 0).then(|| product.sell_price_cents - 2_000),
        delivery_charge_cents: Some(if seed % 3 == 0 { 12_000 } else { 6_000 }),
        status: Some(STATUSES[seed % STATUSES.len()]),
        created_at: Some(Utc::now() - Duration::days(days_ago)),
        ..Default::default()
    }
}
