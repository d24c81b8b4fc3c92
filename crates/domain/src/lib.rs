//! Domain layer for the batch allocation system.
//!
//! This crate provides the pure allocation model:
//! - `Batch` entity with reference-keyed identity and its allocation state
//! - `OrderLine` value object
//! - `allocate`, the selector that picks one batch for an order line
//! - `Money` and `Name`/`Person` value objects
//!
//! Nothing here locks or blocks. Callers that share batches between
//! concurrent requests must serialize allocation themselves.

pub mod allocation;
pub mod error;
pub mod model;
pub mod money;
pub mod operand;
pub mod person;

pub use allocation::{allocate, allocation_priority};
pub use common::{BatchReference, OrderId, Sku};
pub use error::{DomainError, Result};
pub use model::{Batch, OrderLine};
pub use money::Money;
pub use operand::{Operand, OperandKind};
pub use person::{Name, Person, SharedPerson};
