//! Postgres repository adapters (sqlx).
//!
//! Every query excludes soft-deleted rows (`deleted_at IS NULL`) and every
//! order query carries the owner in the WHERE clause.

mod orders;
mod users;

pub use orders::PgOrderRepository;
pub use users::PgUserRepository;

use user_order_core::RepoError;

/// Translate a driver error into the repository taxonomy. Driver messages
/// stay inside `RepoError::Db` and are only ever logged.
pub(crate) fn translate(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            RepoError::UniqueViolation(db.to_string())
        }
        other => RepoError::Db(other.to_string()),
    }
}

/// Postgres has no unsigned integers; ids and counts come back signed.
pub(crate) fn to_u32(v: i32, what: &str) -> Result<u32, RepoError> {
    u32::try_from(v).map_err(|_| RepoError::Db(format!("{what} out of range: {v}")))
}
