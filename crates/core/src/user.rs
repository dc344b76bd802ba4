//! User entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// `password_hash` is intentionally opaque here; hashing and verification
/// live in the auth crate, and the HTTP layer must never serialize it
/// (response DTOs omit the field entirely).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned, immutable, never reused.
    pub id: u32,
    pub name: String,
    /// Unique among non-soft-deleted users (case-insensitive).
    pub email: String,
    pub age: u32,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Non-null marks the user as soft-deleted; default reads exclude it.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A user about to be persisted (no id yet; timestamps set by the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub password_hash: String,
}
