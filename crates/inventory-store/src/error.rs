//! Error types for the storage layer.

use inventory_core::CoreError;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database engine failure.
    #[error("database error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Input rejected before or while writing.
    #[error("validation failed: {0}")]
    Validation(#[from] CoreError),

    /// Item not found.
    #[error("item not found: {0}")]
    ItemNotFound(i64),

    /// User not found.
    #[error("user not found: {0}")]
    UserNotFound(i64),

    /// A unique user field is already taken.
    #[error("{field} is already taken")]
    DuplicateUser { field: &'static str },

    /// Migration error.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl StoreError {
    /// True when the database rejected a write because of a UNIQUE constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Connection(e) => e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation()),
            _ => false,
        }
    }
}
