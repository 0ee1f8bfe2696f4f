//! # Seed Data Generator
//!
//! Populates the database with demo products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p scout-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p scout-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p scout-db --bin seed -- --db ./data/scout.db
//! ```
//!
//! ## Generated Data
//! - Products across beverage/snack/dairy/grocery categories
//! - Code: `{CATEGORY}-{INDEX}`
//! - An EAN-13-looking barcode for every second product
//! - A handful of image references in every raw shape the normalizer
//!   understands (absolute URL, /files/ path, record id, bare filename)
//! - Matching file records for the record-id references

use chrono::{Duration, Utc};
use std::env;

use scout_core::{FileRecord, Product};
use scout_db::repository::product::generate_product_id;
use scout_db::{Database, DbConfig};

/// Product categories for realistic demo data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "BEV",
        &[
            "Coca-Cola",
            "Pepsi",
            "Sprite",
            "Fanta",
            "Red Bull",
            "Orange Juice",
            "Apple Juice",
            "Iced Tea",
            "Sparkling Water",
            "Lemonade",
        ],
    ),
    (
        "SNK",
        &[
            "Lays Classic",
            "Doritos Nacho",
            "Pringles",
            "Snickers",
            "Kit Kat",
            "Twix",
            "Oreos",
            "Pretzels",
            "Gummy Bears",
            "Goldfish",
        ],
    ),
    (
        "DRY",
        &[
            "Whole Milk",
            "Skim Milk",
            "Cheddar Cheese",
            "Butter",
            "Greek Yogurt",
            "Eggs Dozen",
            "Cream Cheese",
            "Sour Cream",
            "Parmesan",
            "Feta Cheese",
        ],
    ),
    (
        "GRO",
        &[
            "White Bread",
            "Pasta Spaghetti",
            "Rice White",
            "Canned Beans",
            "Cereal Cheerios",
            "Peanut Butter",
            "Honey",
            "Flour",
            "Sugar",
            "Salt",
        ],
    ),
];

/// Raw image reference shapes, cycled across seeded products so every
/// normalizer path has demo data.
const IMAGE_SHAPES: &[Option<&str>] = &[
    None,
    Some("/files/{code}.png"),
    Some("https://cdn.scout.example/{code}.png"),
    Some("rec_{code}"),
    Some("{code}.png"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./scout_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
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
                println!("Scout Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./scout_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Scout Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count_listable().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let products = db.products();
    let files = db.files();
    let now = Utc::now();
    let mut generated = 0usize;

    'outer: for (category_code, names) in CATEGORIES {
        for (index, name) in names.iter().enumerate() {
            for variant in 0..(count / (CATEGORIES.len() * names.len()) + 1) {
                if generated >= count {
                    break 'outer;
                }

                let code = format!("{category_code}-{:03}", index * 100 + variant);
                let shape = IMAGE_SHAPES[generated % IMAGE_SHAPES.len()];
                let image = shape.map(|s| s.replace("{code}", &code));

                let product = Product {
                    id: generate_product_id(),
                    code: code.clone(),
                    name: format!("{name} {}", variant + 1),
                    description: Some(format!("{name}, demo variant {}", variant + 1)),
                    price_cents: 99 + (generated as i64 % 20) * 100,
                    image: image.clone(),
                    category: Some(category_code.to_string()),
                    unit: "Unit".to_string(),
                    disabled: false,
                    track_stock: true,
                    current_stock: Some((generated as i64 * 7) % 100),
                    created_at: now - Duration::minutes(generated as i64),
                    updated_at: now - Duration::minutes(generated as i64),
                };

                products.insert(&product).await?;

                // Every second product gets a scannable barcode.
                if generated % 2 == 0 {
                    let barcode = format!("885{:010}", generated);
                    products.add_barcode(&barcode, &product.id).await?;
                }

                // Record-id image references need a matching file record.
                if let Some(raw) = &image {
                    if raw.starts_with("rec_") {
                        let record = FileRecord {
                            id: raw.clone(),
                            file_name: format!("{code}.png"),
                            file_url: Some(format!("/files/{code}.png")),
                            is_private: false,
                        };
                        files.insert(&record, now).await?;
                    }
                }

                generated += 1;
            }
        }
    }

    println!("✓ Generated {} products", generated);
    println!();
    println!("Done. Point SCOUT_DATABASE_PATH at {} and start search-api.", db_path);

    Ok(())
}
