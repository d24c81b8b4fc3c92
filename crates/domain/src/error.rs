//! Domain error types.

use common::{BatchReference, Sku};
use thiserror::Error;

/// Errors raised by the allocation model and its value objects.
///
/// `Batch::allocate` and `Batch::deallocate` never produce these: an
/// unsatisfiable allocation or an unknown deallocation is a silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Money arithmetic between two different currencies.
    #[error("Cannot {operation} {left} to {right}")]
    CurrencyMismatch {
        operation: &'static str,
        left: String,
        right: String,
    },

    /// An operand of an unsupported kind reached an arithmetic or comparison.
    #[error("Invalid operand: expected an integer or {expected}, got {found}")]
    InvalidOperand {
        expected: &'static str,
        found: String,
    },

    /// Money arithmetic whose result does not fit in an `i64`.
    #[error("Money {operation} overflowed")]
    Overflow { operation: &'static str },

    /// Decoded batch state that `Batch::allocate` could never have produced.
    #[error("Invalid batch {reference}: {reason}")]
    InvalidBatch {
        reference: BatchReference,
        reason: String,
    },

    /// No candidate batch can satisfy the order line.
    #[error("Out of stock for sku {0}")]
    OutOfStock(Sku),
}

/// Convenience type alias for domain results.
pub type Result<T> = std::result::Result<T, DomainError>;
