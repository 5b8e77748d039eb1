//! Cart repository for database operations.
//!
//! Concurrent mutations against the same cart (two browser tabs, retried
//! requests) race at the store. Every mutation therefore runs in a
//! transaction that locks the cart row (`SELECT ... FOR UPDATE`) before
//! touching `cart_items`, and additions merge atomically via
//! `ON CONFLICT ... DO UPDATE`, so increments are never lost.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use tamarind_core::{CartId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItem, Product};

/// Database row for a cart item joined against the catalog.
///
/// The `p_*` columns come from a LEFT JOIN and are all-null when the
/// referenced product has been deleted.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    product_id: i32,
    quantity: i32,
    p_id: Option<i32>,
    p_name: Option<String>,
    p_price: Option<Decimal>,
    p_description: Option<String>,
    p_image_url: Option<String>,
    p_created_at: Option<DateTime<Utc>>,
}

impl CartItemRow {
    fn into_domain(self) -> Result<CartItem, RepositoryError> {
        let product = match self.p_id {
            Some(id) => Some(Product {
                id: ProductId::new(id),
                name: self.p_name.ok_or_else(|| join_corruption("name"))?,
                price: self.p_price.ok_or_else(|| join_corruption("price"))?,
                description: self
                    .p_description
                    .ok_or_else(|| join_corruption("description"))?,
                image_url: self.p_image_url,
                created_at: self
                    .p_created_at
                    .ok_or_else(|| join_corruption("created_at"))?,
            }),
            None => None,
        };

        Ok(CartItem {
            product_id: ProductId::new(self.product_id),
            quantity: self.quantity,
            product,
        })
    }
}

fn join_corruption(column: &str) -> RepositoryError {
    RepositoryError::DataCorruption(format!("product join returned null {column}"))
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating an empty one on first access.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let cart_id = ensure_cart(&mut tx, user_id).await?;
        tx.commit().await?;

        self.load(cart_id, user_id).await
    }

    /// Add `quantity` units of a product to the user's cart.
    ///
    /// An existing entry for the product has its quantity summed; otherwise a
    /// new entry is appended after the current last position. The caller is
    /// responsible for validating `quantity >= 1` and product existence.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let cart_id = ensure_cart(&mut tx, user_id).await?;
        lock_cart(&mut tx, cart_id).await?;

        // Position is race-free under the cart row lock.
        sqlx::query(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity, position)
            VALUES (
                $1, $2, $3,
                COALESCE((SELECT MAX(position) + 1 FROM cart_items WHERE cart_id = $1), 0)
            )
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.load(cart_id, user_id).await
    }

    /// Replace an entry's quantity; `quantity <= 0` removes the entry.
    ///
    /// Returns `None` when the user has no cart or no entry for the product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn update_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Option<Cart>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let Some(cart_id) = find_cart_locked(&mut tx, user_id).await? else {
            return Ok(None);
        };

        let result = if quantity <= 0 {
            sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
                .bind(cart_id)
                .bind(product_id)
                .execute(&mut *tx)
                .await?
        } else {
            sqlx::query(
                "UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND product_id = $2",
            )
            .bind(cart_id)
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?
        };

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tx.commit().await?;

        Ok(Some(self.load(cart_id, user_id).await?))
    }

    /// Remove an entry. Removing an absent entry is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let cart_id = ensure_cart(&mut tx, user_id).await?;
        lock_cart(&mut tx, cart_id).await?;

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
            .bind(cart_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.load(cart_id, user_id).await
    }

    /// Empty the user's cart. The cart row itself persists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if let Some(cart_id) = find_cart_locked(&mut tx, user_id).await? {
            sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
                .bind(cart_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Load a cart with its items in insertion order, products LEFT JOINed.
    async fn load(&self, cart_id: CartId, user_id: UserId) -> Result<Cart, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT ci.product_id, ci.quantity,
                   p.id AS p_id, p.name AS p_name, p.price AS p_price,
                   p.description AS p_description, p.image_url AS p_image_url,
                   p.created_at AS p_created_at
            FROM cart_items ci
            LEFT JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.position ASC
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(CartItemRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Cart {
            id: cart_id,
            user_id,
            items,
        })
    }
}

/// Insert the user's cart row if absent, returning its ID either way.
async fn ensure_cart(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
) -> Result<CartId, RepositoryError> {
    // DO UPDATE (rather than DO NOTHING) makes RETURNING yield the existing row.
    let id: i32 = sqlx::query_scalar(
        r"
        INSERT INTO carts (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING id
        ",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(CartId::new(id))
}

/// Take the row lock that serializes mutations of a cart.
async fn lock_cart(
    tx: &mut Transaction<'_, Postgres>,
    cart_id: CartId,
) -> Result<(), RepositoryError> {
    sqlx::query("SELECT id FROM carts WHERE id = $1 FOR UPDATE")
        .bind(cart_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Find and lock the user's cart, if one exists.
async fn find_cart_locked(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
) -> Result<Option<CartId>, RepositoryError> {
    let id: Option<i32> = sqlx::query_scalar("SELECT id FROM carts WHERE user_id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(id.map(CartId::new))
}
