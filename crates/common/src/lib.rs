//! Identifier types shared by every layer of the allocation system.

pub mod types;

pub use types::{BatchReference, OrderId, Sku};
