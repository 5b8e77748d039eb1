//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tamarind_core::{Email, Role, UserId};

/// A registered user (domain type).
///
/// The password hash is deliberately not part of this type; it only travels
/// through `db::users` during credential verification and is never serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (unique).
    pub email: Email,
    /// Role assigned at registration, fixed for the account's lifetime.
    pub role: Role,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
