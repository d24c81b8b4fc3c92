//! Service error types.

use domain::DomainError;
use repository::RepositoryError;
use thiserror::Error;

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An order line asked for zero units.
    #[error("Invalid quantity: {0} (must be greater than 0)")]
    InvalidQuantity(u32),

    /// A required identifier was empty.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Domain error.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Convenience type alias for service results.
pub type Result<T> = std::result::Result<T, ServiceError>;
