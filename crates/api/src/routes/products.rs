//! Product catalog route handlers.
//!
//! Reads are public; mutations require a valid admin token. Authorization is
//! enforced entirely by the [`RequireAdmin`] extractor - the repository layer
//! performs none.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tamarind_core::ProductId;

use crate::db::products::{ProductInput, ProductRepository};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Product;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Product create/update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl ProductRequest {
    /// Validate the body into repository input.
    fn into_input(self) -> Result<ProductInput> {
        let name = match self.name {
            Some(n) if !n.trim().is_empty() => n,
            _ => return Err(ApiError::Validation("name is required".to_string())),
        };
        let price = self
            .price
            .ok_or_else(|| ApiError::Validation("price is required".to_string()))?;
        if price < Decimal::ZERO {
            return Err(ApiError::Validation(
                "price must be non-negative".to_string(),
            ));
        }

        Ok(ProductInput {
            name,
            price,
            description: self.description.unwrap_or_default(),
            image_url: self.image_url,
        })
    }
}

/// Response for the product listing.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub count: usize,
    pub products: Vec<Product>,
}

/// Response for a single product.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

/// Response carrying only a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// List all products, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<ProductListResponse>> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(Json(ProductListResponse {
        success: true,
        count: products.len(),
        products,
    }))
}

/// Get a single product.
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// Create a product (admin only).
///
/// # Errors
///
/// Returns 400 for invalid fields, 401/403 without an admin token.
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let input = body.into_input()?;
    let product = ProductRepository::new(state.pool()).create(&input).await?;

    tracing::info!(product_id = %product.id, name = %product.name, "product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            product,
        }),
    ))
}

/// Update a product (admin only).
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductRequest>,
) -> Result<Json<ProductResponse>> {
    let input = body.into_input()?;
    let product = ProductRepository::new(state.pool())
        .update(id, &input)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// Delete a product (admin only).
///
/// Cart entries referencing the product are left dangling; cart reads render
/// them with null product details.
///
/// # Errors
///
/// Returns 404 if the product doesn't exist.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    tracing::info!(product_id = %id, "product deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "Product deleted successfully".to_string(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(name: Option<&str>, price: Option<&str>) -> ProductRequest {
        ProductRequest {
            name: name.map(String::from),
            price: price.map(|p| p.parse().unwrap()),
            description: None,
            image_url: None,
        }
    }

    #[test]
    fn test_valid_request() {
        let input = request(Some("Mango"), Some("10.00")).into_input().unwrap();
        assert_eq!(input.name, "Mango");
        assert_eq!(input.price.to_string(), "10.00");
        assert_eq!(input.description, "");
    }

    #[test]
    fn test_missing_name_rejected() {
        assert!(request(None, Some("1")).into_input().is_err());
        assert!(request(Some("  "), Some("1")).into_input().is_err());
    }

    #[test]
    fn test_missing_price_rejected() {
        assert!(request(Some("Mango"), None).into_input().is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = request(Some("Mango"), Some("-0.01"))
            .into_input()
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_zero_price_allowed() {
        assert!(request(Some("Freebie"), Some("0")).into_input().is_ok());
    }
}
