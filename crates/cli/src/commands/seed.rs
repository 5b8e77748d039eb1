//! Catalog seeding command.

use rust_decimal::Decimal;

use super::CommandError;

/// Demo catalog rows: (name, price, description, image URL).
const DEMO_PRODUCTS: &[(&str, &str, &str, Option<&str>)] = &[
    (
        "Wireless Headphones",
        "59.99",
        "Over-ear Bluetooth headphones with 30h battery life.",
        Some("https://images.example.com/headphones.jpg"),
    ),
    (
        "Mechanical Keyboard",
        "89.00",
        "Tenkeyless keyboard with hot-swappable switches.",
        Some("https://images.example.com/keyboard.jpg"),
    ),
    (
        "USB-C Charger",
        "19.50",
        "65W GaN fast charger with dual ports.",
        None,
    ),
    (
        "Laptop Stand",
        "34.00",
        "Adjustable aluminium stand for 13-16 inch laptops.",
        Some("https://images.example.com/stand.jpg"),
    ),
];

/// Insert demo products into the catalog.
///
/// Safe to run repeatedly: rows are inserted each time, so prefer running it
/// once against a fresh database.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    for &(name, price, description, image_url) in DEMO_PRODUCTS {
        let price: Decimal = price.parse().unwrap_or_default();

        sqlx::query(
            r"
            INSERT INTO products (name, price, description, image_url)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(name)
        .bind(price)
        .bind(description)
        .bind(image_url)
        .execute(&pool)
        .await?;

        tracing::info!(%name, "seeded product");
    }

    tracing::info!("Seeding complete!");
    Ok(())
}
