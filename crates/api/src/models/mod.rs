//! Domain types for the API.
//!
//! These types represent validated domain objects separate from database row
//! types; the wire representation (camelCase JSON) lives here too since the
//! API is the only consumer.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem};
pub use product::Product;
pub use user::User;
