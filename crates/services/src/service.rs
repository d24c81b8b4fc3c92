//! Allocation service providing the use-case API over a batch repository.

use std::time::Instant;

use common::{BatchReference, Sku};
use domain::{Batch, DomainError};
use repository::{BatchRepository, BatchRepositoryExt, RepositoryError};
use tokio::sync::Mutex;

use crate::commands::{AddBatch, Allocate, Deallocate};
use crate::error::{Result, ServiceError};

/// Service for managing batches and allocating order lines to them.
///
/// Each allocation is a read-modify-write cycle against the repository
/// (load candidates, allocate in memory, save the chosen batch). Cycles
/// run one at a time under `write_lock`, so two requests never allocate
/// against the same stale stock.
pub struct AllocationService<R: BatchRepository> {
    repo: R,
    write_lock: Mutex<()>,
}

impl<R: BatchRepository> AllocationService<R> {
    /// Creates a new allocation service over the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    /// Registers a new batch.
    #[tracing::instrument(skip(self))]
    pub async fn add_batch(&self, cmd: AddBatch) -> Result<Batch> {
        ensure_present("reference", cmd.reference.as_str())?;
        ensure_present("sku", cmd.sku.as_str())?;

        let batch = Batch::new(cmd.reference, cmd.sku, cmd.quantity, cmd.eta);
        self.repo.add(batch.clone()).await?;

        metrics::counter!("batches_added_total").increment(1);
        tracing::info!(reference = %batch.reference(), sku = %batch.sku(), "batch added");
        Ok(batch)
    }

    /// Allocates an order line to the preferred batch and returns its reference.
    #[tracing::instrument(skip(self))]
    pub async fn allocate(&self, cmd: Allocate) -> Result<BatchReference> {
        ensure_present("orderid", cmd.orderid.as_str())?;
        ensure_present("sku", cmd.sku.as_str())?;
        if cmd.qty == 0 {
            return Err(ServiceError::InvalidQuantity(cmd.qty));
        }

        let line = cmd.line();
        let start = Instant::now();
        let _guard = self.write_lock.lock().await;

        let mut batches = self.repo.list_for_sku(line.sku()).await?;
        let batchref = match domain::allocate(&line, &mut batches) {
            Ok(batchref) => batchref,
            Err(e @ DomainError::OutOfStock(_)) => {
                metrics::counter!("allocations_out_of_stock_total").increment(1);
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        let chosen = batches
            .iter()
            .find(|batch| *batch.reference() == batchref)
            .ok_or_else(|| RepositoryError::BatchNotFound(batchref.clone()))?;
        self.repo.save(chosen).await?;

        metrics::counter!("allocations_total").increment(1);
        metrics::histogram!("allocation_duration_seconds").record(start.elapsed().as_secs_f64());
        tracing::info!(
            orderid = %line.orderid(),
            batchref = %batchref,
            "order line allocated"
        );

        Ok(batchref)
    }

    /// Releases an order line from a batch and returns the updated batch.
    ///
    /// Releasing a line that was never allocated to the batch is not an
    /// error; the batch comes back unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn deallocate(&self, cmd: Deallocate) -> Result<Batch> {
        let line = cmd.line();
        let _guard = self.write_lock.lock().await;

        let mut batch = self.repo.get_existing(&cmd.reference).await?;
        if !batch.is_allocated(&line) {
            tracing::debug!(
                reference = %cmd.reference,
                orderid = %line.orderid(),
                "line not allocated to batch, nothing to release"
            );
            return Ok(batch);
        }

        batch.deallocate(&line);
        self.repo.save(&batch).await?;

        metrics::counter!("deallocations_total").increment(1);
        tracing::info!(reference = %cmd.reference, orderid = %line.orderid(), "order line released");
        Ok(batch)
    }

    /// Loads a batch by reference.
    ///
    /// Returns None if the batch doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_batch(&self, reference: &BatchReference) -> Result<Option<Batch>> {
        Ok(self.repo.get(reference).await?)
    }

    /// Lists every batch, ordered by reference.
    pub async fn list_batches(&self) -> Result<Vec<Batch>> {
        Ok(self.repo.list().await?)
    }

    /// Lists the batches of one SKU, ordered by reference.
    pub async fn batches_for_sku(&self, sku: &Sku) -> Result<Vec<Batch>> {
        Ok(self.repo.list_for_sku(sku).await?)
    }
}

fn ensure_present(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(())
}
