//! HTTP route handlers.

pub mod allocations;
pub mod batches;
pub mod health;
pub mod metrics;

use repository::BatchRepository;
use services::AllocationService;

/// Shared application state accessible from all handlers.
pub struct AppState<R: BatchRepository> {
    pub service: AllocationService<R>,
}
