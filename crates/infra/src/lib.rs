//! `user-order-infra` — persistence adapters and process configuration.
//!
//! Two implementations of the core repository traits live here: the
//! Postgres adapters used in production and an in-memory store used by the
//! test suites. Both honor the same contract (error taxonomy, soft-delete
//! visibility, ownership predicates).

pub mod config;
pub mod db;
pub mod memory;
pub mod postgres;

pub use config::{Config, ConfigError, DbConfig};
pub use db::connect_pool;
pub use memory::InMemoryStore;
pub use postgres::{PgOrderRepository, PgUserRepository};
