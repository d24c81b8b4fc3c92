//! Service layer for the batch allocation system.
//!
//! `AllocationService` loads candidate batches from a `BatchRepository`,
//! runs the domain selector, and writes the chosen batch back. It is also
//! where concurrent allocation requests are serialized: the domain model
//! itself does no locking.

pub mod commands;
pub mod error;
pub mod service;

pub use commands::{AddBatch, Allocate, Deallocate};
pub use error::{Result, ServiceError};
pub use service::AllocationService;
