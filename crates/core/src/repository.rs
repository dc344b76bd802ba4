//! Repository traits — the only seam to persistence.
//!
//! Any implementation (relational, in-memory for tests) is acceptable as
//! long as it honors the error taxonomy and the soft-delete semantics:
//! rows with a non-null `deleted_at` are invisible to every operation here.

use async_trait::async_trait;

use crate::error::RepoResult;
use crate::order::{NewOrder, Order};
use crate::page::{Page, PageRequest, UserFilter};
use crate::user::{NewUser, User};

/// Persistence for user aggregates.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. The store assigns `id`, `created_at` and
    /// `updated_at`. A duplicate email surfaces as
    /// [`RepoError::UniqueViolation`](crate::RepoError::UniqueViolation).
    async fn create(&self, user: NewUser) -> RepoResult<User>;

    /// Fetch by id. `id == 0` short-circuits to `NotFound` without touching
    /// the store.
    async fn get_by_id(&self, id: u32) -> RepoResult<User>;

    /// Fetch by email (case-insensitive). An empty email short-circuits to
    /// `NotFound`.
    async fn get_by_email(&self, email: &str) -> RepoResult<User>;

    /// Persist `name`, `email` and `age` of an already-merged entity.
    /// Zero matched rows yields `NoRowsAffected`.
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Soft-delete the user and, in the same transaction, all of their
    /// orders. Zero matched rows yields `NotFound`.
    async fn delete(&self, id: u32) -> RepoResult<()>;

    /// List non-deleted users matching `filter`, paginated. The returned
    /// total counts every match *before* pagination.
    async fn list(&self, page: PageRequest, filter: &UserFilter) -> RepoResult<Page<User>>;
}

/// Persistence for order aggregates, scoped by owner.
///
/// Ownership is enforced in the WHERE clause of every read and mutation,
/// never by a separate look-up, so there is no check-then-act window.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: NewOrder) -> RepoResult<Order>;

    /// `NotFound` covers both "does not exist" and "exists but not owned".
    async fn get_by_id(&self, order_id: u32, owner_id: u32) -> RepoResult<Order>;

    /// Orders of one owner, newest ids last. Total counts all of the
    /// owner's non-deleted orders.
    async fn list_by_user(&self, owner_id: u32, offset: u64, limit: u32) -> RepoResult<Page<Order>>;

    /// Persist `product_name`, `quantity` and `price`; guarded by
    /// `WHERE id AND user_id`. Zero matched rows yields `NoRowsAffected`.
    async fn update(&self, order: &Order) -> RepoResult<()>;

    /// Soft-delete, guarded by owner. Zero matched rows yields `NotFound`.
    async fn delete(&self, order_id: u32, owner_id: u32) -> RepoResult<()>;
}
