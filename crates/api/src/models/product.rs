//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use tamarind_core::ProductId;

/// A catalog product (domain type).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price. Non-negative; validated at the HTTP boundary.
    pub price: Decimal,
    /// Product description.
    pub description: String,
    /// Optional image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// When the product was created. Catalog listings sort on this, newest first.
    pub created_at: DateTime<Utc>,
}
