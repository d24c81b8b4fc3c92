pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::{BatchReference, Sku};
pub use error::{RepositoryError, Result};
pub use memory::InMemoryBatchRepository;
pub use postgres::PostgresBatchRepository;
pub use store::{BatchRepository, BatchRepositoryExt};
