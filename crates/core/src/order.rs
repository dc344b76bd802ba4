//! Order entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An order placed by a user.
///
/// The owner pointer (`user_id`) is set once at creation and never changes;
/// every repository read and mutation carries it in the WHERE clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u32,
    /// Owning user; immutable after creation.
    pub user_id: u32,
    pub product_name: String,
    pub quantity: u32,
    /// Positive; two fractional digits are sufficient for persistence.
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// An order about to be persisted (owner already resolved by the service).
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: u32,
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
}
