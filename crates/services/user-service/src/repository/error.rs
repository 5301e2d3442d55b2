//! Repository errors and storage-error classification.

use common::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Lowercased message fragments that identify a unique-constraint violation
/// when the driver error was not classified structurally.
///
/// Postgres: `duplicate key value violates unique constraint`,
/// SQLite: `UNIQUE constraint failed`, MySQL: `Duplicate entry`.
const DUPLICATE_KEY_SIGNATURES: &[&str] = &[
    "duplicate key",
    "unique constraint failed",
    "duplicate entry",
];

/// Failures surfaced by the repository.
#[derive(Error, Debug)]
pub enum RepoError {
    /// The write would give two users the same username
    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Any other persistence failure (connectivity, timeout, unrelated constraint)
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] DbErr),
}

/// Result type alias for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    /// Classify a failed write against `users`.
    ///
    /// `username` is the value the write tried to store.
    pub fn classify_write(err: DbErr, username: &str) -> Self {
        if is_duplicate_key(&err) {
            RepoError::DuplicateUsername(username.to_string())
        } else {
            RepoError::StorageFailure(err)
        }
    }
}

/// Whether a storage error reports a unique-constraint violation.
pub fn is_duplicate_key(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }

    let message = err.to_string().to_lowercase();
    DUPLICATE_KEY_SIGNATURES
        .iter()
        .any(|signature| message.contains(signature))
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::DuplicateUsername(username) => AppError::DuplicateUsername(username),
            RepoError::StorageFailure(source) => AppError::operation_failed("storage", source),
        }
    }
}
