//! Cart route handlers.
//!
//! Every handler operates on the authenticated caller's own cart, identified
//! by the token's user ID; product IDs select entries within it.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use tamarind_core::ProductId;

use crate::error::{ApiError, Result};
use crate::middleware::RequireUser;
use crate::models::Cart;
use crate::services::cart::CartService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: Option<ProductId>,
    /// Units to add; defaults to 1.
    pub quantity: Option<i32>,
}

/// Update-quantity request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub product_id: Option<ProductId>,
    pub quantity: Option<i32>,
}

/// Response carrying the full cart.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub success: bool,
    pub cart: Cart,
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

/// Get the caller's cart, creating an empty one on first access.
pub async fn get(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.pool())
        .get_cart(principal.user_id)
        .await?;

    Ok(Json(CartResponse {
        success: true,
        cart,
    }))
}

/// Add a product to the caller's cart, merging quantities.
///
/// # Errors
///
/// Returns 400 for a non-positive quantity, 404 for an unknown product.
pub async fn add(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<CartResponse>> {
    let product_id = body
        .product_id
        .ok_or_else(|| ApiError::Validation("productId is required".to_string()))?;
    let quantity = body.quantity.unwrap_or(1);

    let cart = CartService::new(state.pool())
        .add_item(principal.user_id, product_id, quantity)
        .await?;

    Ok(Json(CartResponse {
        success: true,
        cart,
    }))
}

/// Replace an entry's quantity; zero or less removes the entry.
///
/// # Errors
///
/// Returns 404 when the caller has no cart or no entry for the product.
pub async fn update(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<CartResponse>> {
    let product_id = body
        .product_id
        .ok_or_else(|| ApiError::Validation("productId is required".to_string()))?;
    let quantity = body
        .quantity
        .ok_or_else(|| ApiError::Validation("quantity is required".to_string()))?;

    let cart = CartService::new(state.pool())
        .update_item(principal.user_id, product_id, quantity)
        .await?;

    Ok(Json(CartResponse {
        success: true,
        cart,
    }))
}

/// Remove an entry from the caller's cart (idempotent).
pub async fn remove(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.pool())
        .remove_item(principal.user_id, product_id)
        .await?;

    Ok(Json(CartResponse {
        success: true,
        cart,
    }))
}

/// Empty the caller's cart. Used by checkout; nothing else is recorded.
pub async fn clear(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>> {
    CartService::new(state.pool())
        .clear_cart(principal.user_id)
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Cart cleared successfully".to_string(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tamarind_core::{CartId, UserId};

    #[test]
    fn test_add_request_defaults_quantity() {
        let body: AddItemRequest = serde_json::from_str(r#"{"productId": 3}"#).unwrap();
        assert_eq!(body.product_id, Some(ProductId::new(3)));
        assert_eq!(body.quantity, None);
    }

    #[test]
    fn test_cart_response_shape() {
        let response = CartResponse {
            success: true,
            cart: Cart {
                id: CartId::new(1),
                user_id: UserId::new(2),
                items: Vec::new(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["cart"]["id"], 1);
        assert_eq!(json["cart"]["userId"], 2);
        assert!(json["cart"]["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_dangling_item_serializes_null_product() {
        use crate::models::CartItem;

        let cart = Cart {
            id: CartId::new(1),
            user_id: UserId::new(2),
            items: vec![CartItem {
                product_id: ProductId::new(9),
                quantity: 2,
                product: None,
            }],
        };
        let json = serde_json::to_value(&cart).unwrap();
        let item = json["items"].as_array().unwrap().first().unwrap();
        assert_eq!(item["productId"], 9);
        assert_eq!(item["quantity"], 2);
        assert!(item["product"].is_null());
    }
}
