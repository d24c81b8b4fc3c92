use thiserror::Error;

use crate::BatchReference;

/// Errors that can occur when loading or storing batches.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No batch is stored under this reference.
    #[error("Batch not found: {0}")]
    BatchNotFound(BatchReference),

    /// A batch with this reference is already stored.
    #[error("Batch already exists: {0}")]
    DuplicateBatch(BatchReference),

    /// A stored row could not be mapped back onto a batch.
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
