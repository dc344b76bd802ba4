//! Repository error taxonomy.

use thiserror::Error;

/// Result type used across the repository seam.
pub type RepoResult<T> = Result<T, RepoError>;

/// Error reported by a repository implementation.
///
/// Keep this small and store-agnostic: services translate these into their
/// own taxonomy, and nothing above the service layer should ever see a
/// driver-native error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// The requested row does not exist, is soft-deleted, or is not visible
    /// to the caller (e.g. owned by someone else).
    #[error("not found")]
    NotFound,

    /// A mutation matched zero rows (concurrent delete, stale id).
    #[error("no rows affected")]
    NoRowsAffected,

    /// A unique constraint was violated (e.g. the email index).
    #[error("unique violation: {0}")]
    UniqueViolation(String),

    /// Any other store-side failure. The message is for logs only and must
    /// never reach a client.
    #[error("database error: {0}")]
    Db(String),
}

impl RepoError {
    pub fn db(msg: impl Into<String>) -> Self {
        Self::Db(msg.into())
    }
}
