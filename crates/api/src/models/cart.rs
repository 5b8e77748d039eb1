//! Cart domain types and item-list semantics.
//!
//! The item-list rules (merge on add, replace on update, drop at zero,
//! idempotent remove) are plain functions over `Vec<CartItem>` so they can be
//! exercised without a database. `db::carts` implements the same semantics in
//! SQL under a row lock; the two must not diverge.

use serde::Serialize;

use tamarind_core::{CartId, ProductId, UserId};

use super::product::Product;

/// A single cart entry.
///
/// `product` is a weak reference: when the referenced product has been
/// deleted from the catalog the join yields `None` and the entry is rendered
/// with `product: null` rather than failing the cart read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// The referenced product's ID.
    pub product_id: ProductId,
    /// Number of units. Always >= 1; an entry at zero is deleted instead.
    pub quantity: i32,
    /// Joined product details, `None` when the product no longer exists.
    pub product: Option<Product>,
}

/// A user's cart (domain type). One cart per user, created lazily.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user. Carts are only ever read or mutated by their owner.
    pub user_id: UserId,
    /// Entries in insertion order.
    pub items: Vec<CartItem>,
}

/// Merge an increment into an item list.
///
/// An existing entry for `product_id` has its quantity summed; otherwise a new
/// entry is appended, preserving insertion order. Callers must have validated
/// `quantity >= 1` and the product's existence.
pub fn apply_add(items: &mut Vec<CartItem>, product_id: ProductId, quantity: i32) {
    if let Some(item) = items.iter_mut().find(|i| i.product_id == product_id) {
        item.quantity += quantity;
    } else {
        items.push(CartItem {
            product_id,
            quantity,
            product: None,
        });
    }
}

/// Replace an entry's quantity, removing the entry when `quantity <= 0`.
///
/// Returns `false` when no entry for `product_id` exists (the caller maps
/// this to `NotFound`).
pub fn apply_update(items: &mut Vec<CartItem>, product_id: ProductId, quantity: i32) -> bool {
    let Some(pos) = items.iter().position(|i| i.product_id == product_id) else {
        return false;
    };

    if quantity <= 0 {
        items.remove(pos);
    } else if let Some(item) = items.get_mut(pos) {
        item.quantity = quantity;
    }
    true
}

/// Remove an entry if present. Removing an absent entry is a no-op.
pub fn apply_remove(items: &mut Vec<CartItem>, product_id: ProductId) {
    items.retain(|i| i.product_id != product_id);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(product_id: i32, quantity: i32) -> CartItem {
        CartItem {
            product_id: ProductId::new(product_id),
            quantity,
            product: None,
        }
    }

    #[test]
    fn test_add_merges_quantities() {
        let mut items = Vec::new();
        apply_add(&mut items, ProductId::new(1), 2);
        apply_add(&mut items, ProductId::new(1), 3);

        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_add_appends_new_entries_in_order() {
        let mut items = Vec::new();
        apply_add(&mut items, ProductId::new(3), 1);
        apply_add(&mut items, ProductId::new(1), 1);
        apply_add(&mut items, ProductId::new(2), 1);

        let order: Vec<i32> = items.iter().map(|i| i.product_id.as_i32()).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn test_add_merge_keeps_position() {
        let mut items = vec![item(1, 1), item(2, 1)];
        apply_add(&mut items, ProductId::new(1), 4);

        let order: Vec<i32> = items.iter().map(|i| i.product_id.as_i32()).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(items.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_update_replaces_quantity() {
        let mut items = vec![item(1, 2)];
        assert!(apply_update(&mut items, ProductId::new(1), 7));
        assert_eq!(items.first().unwrap().quantity, 7);
    }

    #[test]
    fn test_update_to_zero_removes_entry() {
        let mut items = vec![item(1, 2), item(2, 1)];
        assert!(apply_update(&mut items, ProductId::new(1), 0));
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().product_id, ProductId::new(2));
    }

    #[test]
    fn test_update_negative_removes_entry() {
        let mut items = vec![item(1, 2)];
        assert!(apply_update(&mut items, ProductId::new(1), -3));
        assert!(items.is_empty());
    }

    #[test]
    fn test_update_missing_entry_reports_not_found() {
        let mut items = vec![item(1, 2)];
        assert!(!apply_update(&mut items, ProductId::new(9), 1));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut items = vec![item(1, 2)];
        apply_remove(&mut items, ProductId::new(9));
        assert_eq!(items.len(), 1);

        apply_remove(&mut items, ProductId::new(1));
        assert!(items.is_empty());

        apply_remove(&mut items, ProductId::new(1));
        assert!(items.is_empty());
    }
}
