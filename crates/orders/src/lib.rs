//! `user-order-orders` — business rules for the order aggregate.
//!
//! Input validation, ownership propagation from the authenticated identity,
//! selective update with no-op detection, and owner-scoped listing.

pub mod service;

pub use service::{CreateOrder, OrderPatch, OrderService, OrderServiceError};
