//! Cart service.
//!
//! All operations are scoped to the authenticated caller's own cart; there is
//! no cross-user access path. Merge/update/remove semantics are shared with
//! the pure functions in [`crate::models::cart`]; persistence goes through
//! the row-locked queries in [`crate::db::carts`].

use sqlx::PgPool;
use thiserror::Error;

use tamarind_core::{ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::models::Cart;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The referenced product does not exist in the catalog.
    #[error("product not found")]
    ProductNotFound,

    /// No entry for the product exists in the caller's cart.
    #[error("product not found in cart")]
    ItemNotFound,

    /// An add with a non-positive quantity.
    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Get the caller's cart, creating an empty one on first access.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the store fails.
    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart, CartError> {
        Ok(self.carts.get_or_create(user_id).await?)
    }

    /// Add `quantity` units of a product, merging with any existing entry.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity <= 0`.
    /// Returns `CartError::ProductNotFound` if the product doesn't exist.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity);
        }

        // Existence is checked at add time only; a product deleted later
        // leaves a dangling entry that reads tolerate.
        if !self.products.exists(product_id).await? {
            return Err(CartError::ProductNotFound);
        }

        Ok(self.carts.add_item(user_id, product_id, quantity).await?)
    }

    /// Replace an entry's quantity; `quantity <= 0` removes the entry.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the caller has no cart or no
    /// entry for the product.
    pub async fn update_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        self.carts
            .update_item(user_id, product_id, quantity)
            .await?
            .ok_or(CartError::ItemNotFound)
    }

    /// Remove an entry. Idempotent: removing an absent entry succeeds with
    /// the unchanged cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the store fails.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Cart, CartError> {
        Ok(self.carts.remove_item(user_id, product_id).await?)
    }

    /// Empty the caller's cart. The cart entity persists.
    ///
    /// Checkout clears the cart and records nothing else; there is no order
    /// history model.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the store fails.
    pub async fn clear_cart(&self, user_id: UserId) -> Result<(), CartError> {
        Ok(self.carts.clear(user_id).await?)
    }
}
