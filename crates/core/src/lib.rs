//! `user-order-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the `User` and `Order` entities, pagination/filter value objects, the
//! repository error taxonomy, and the repository traits that form the only
//! seam to persistence.

pub mod error;
pub mod order;
pub mod page;
pub mod repository;
pub mod user;

pub use error::{RepoError, RepoResult};
pub use order::{NewOrder, Order};
pub use page::{Page, PageRequest, UpdateOutcome, UserFilter, MAX_PAGE_LIMIT};
pub use repository::{OrderRepository, UserRepository};
pub use user::{NewUser, User};
