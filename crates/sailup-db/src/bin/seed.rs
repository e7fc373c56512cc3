//! # Seed Data Generator
//!
//! Populates the database with demo data for development.
//!
//! ## Usage
//! ```bash
//! # Default database path (./sailup_dev.db)
//! cargo run -p sailup-db --bin seed
//!
//! # Specify database path
//! cargo run -p sailup-db --bin seed -- --db ./data/sailup.db
//! ```
//!
//! ## Generated Data
//! - A demo customer account (password: `Passw0rd!`)
//! - A handful of boats and experiences with it/en translations
//! - One confirmed demo booking next weekend

use std::env;

use chrono::{Duration, Utc};
use tracing_subscriber::EnvFilter;

use sailup_core::{
    BookingStatus, BookingWindow, NewAddress, NewBooking, NewProduct, NewTranslation,
    PaymentMethod, ProductType, RegistrationInput, ValidationPolicy,
};
use sailup_db::{Database, DbConfig};

/// Demo catalog: (code, type, price cents, seats, accessible, length, licence,
/// italian name, english name)
const PRODUCTS: &[(
    &str,
    ProductType,
    i64,
    i64,
    bool,
    Option<f64>,
    bool,
    &str,
    &str,
)] = &[
    (
        "BARCA-01",
        ProductType::Rental,
        12000,
        6,
        false,
        Some(7.5),
        false,
        "Gozzo sorrentino",
        "Sorrento gozzo",
    ),
    (
        "BARCA-02",
        ProductType::Rental,
        28000,
        10,
        true,
        Some(12.0),
        true,
        "Lancia cabinata",
        "Cabin launch",
    ),
    (
        "TOUR-01",
        ProductType::Experience,
        4500,
        12,
        true,
        None,
        false,
        "Tramonto in barca",
        "Sunset cruise",
    ),
    (
        "TOUR-02",
        ProductType::Experience,
        9000,
        8,
        false,
        None,
        false,
        "Giro delle grotte",
        "Sea caves tour",
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./sailup_dev.db");

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
                println!("SailUp Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./sailup_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("SailUp Seed Data Generator");
    println!("==========================");
    println!("Database: {db_path}");
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.products().count().await? > 0 {
        println!("⚠ Database already has products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Demo catalog
    for &(code, product_type, price, seats, accessible, length, license, it_name, en_name) in
        PRODUCTS
    {
        db.products()
            .create(
                &NewProduct {
                    code: code.to_string(),
                    product_type,
                    base_price_cents: price,
                    total_seats: seats,
                    accessible,
                    boat_length_m: length,
                    license_required: license,
                },
                &[
                    NewTranslation {
                        language_code: "it".to_string(),
                        name: it_name.to_string(),
                        description: Some(format!("{it_name} - partenza dal molo Beverello")),
                        specs: None,
                    },
                    NewTranslation {
                        language_code: "en".to_string(),
                        name: en_name.to_string(),
                        description: Some(format!("{en_name} - departing from Beverello pier")),
                        specs: None,
                    },
                ],
            )
            .await?;
        println!("✓ Product {code}");
    }

    // Demo customer
    let user = db
        .users()
        .register(
            &RegistrationInput {
                first_name: "Gianni".to_string(),
                last_name: "Esposito".to_string(),
                fiscal_code: "RSSMRA85T10A562S".to_string(),
                email: "demo@sailup.example".to_string(),
                password: "Passw0rd!".to_string(),
                nautical_license: Some("1234567".to_string()),
                address: NewAddress {
                    street: "Via Caracciolo 12".to_string(),
                    house_number: "12".to_string(),
                    postal_code: "80122".to_string(),
                    city: "Napoli".to_string(),
                    province: "NA".to_string(),
                    country: None,
                },
            },
            &ValidationPolicy::default(),
        )
        .await?;
    println!("✓ Demo user {} (id {})", user.email, user.id);

    // One confirmed booking next weekend
    let start = Utc::now() + Duration::days(7);
    let booking_id = db
        .bookings()
        .create(&NewBooking {
            user_id: user.id,
            product_id: "BARCA-01".to_string(),
            window: BookingWindow::new(start, start + Duration::hours(8))?,
            skipper_requested: true,
            guide_language: Some("it".to_string()),
            total_price_cents: 48000,
            payment_method: PaymentMethod::Card,
            status: None,
            notes: Some("demo booking".to_string()),
        })
        .await?;
    db.bookings()
        .update_status(booking_id, BookingStatus::Confirmed)
        .await?;
    println!("✓ Demo booking {booking_id} confirmed");

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
