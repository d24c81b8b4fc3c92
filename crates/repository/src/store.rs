use async_trait::async_trait;
use domain::Batch;

use crate::{BatchReference, RepositoryError, Result, Sku};

/// Core trait for batch repositories.
///
/// A repository loads and stores whole `Batch` values keyed by their
/// reference. Loading the same reference twice yields batches that compare
/// equal, since batch equality is reference-based. Mutations made to a
/// loaded batch are not visible to the repository until `save` is called.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait BatchRepository: Send + Sync {
    /// Persists a new batch.
    ///
    /// Fails with `DuplicateBatch` if the reference is already stored.
    async fn add(&self, batch: Batch) -> Result<()>;

    /// Loads a batch by reference.
    ///
    /// Returns None if no batch is stored under this reference.
    async fn get(&self, reference: &BatchReference) -> Result<Option<Batch>>;

    /// Loads every stored batch, ordered by reference.
    async fn list(&self) -> Result<Vec<Batch>>;

    /// Loads the batches of one SKU, ordered by reference.
    async fn list_for_sku(&self, sku: &Sku) -> Result<Vec<Batch>>;

    /// Writes back the allocation state of an existing batch.
    ///
    /// Fails with `BatchNotFound` if the batch was never added.
    async fn save(&self, batch: &Batch) -> Result<()>;
}

/// Extension trait providing convenience methods for batch repositories.
#[async_trait]
pub trait BatchRepositoryExt: BatchRepository {
    /// Loads a batch, failing with `BatchNotFound` when it is missing.
    async fn get_existing(&self, reference: &BatchReference) -> Result<Batch> {
        self.get(reference)
            .await?
            .ok_or_else(|| RepositoryError::BatchNotFound(reference.clone()))
    }

    /// Checks if a batch is stored under this reference.
    async fn exists(&self, reference: &BatchReference) -> Result<bool> {
        Ok(self.get(reference).await?.is_some())
    }

    /// Saves several batches in sequence, stopping at the first failure.
    async fn save_all(&self, batches: &[Batch]) -> Result<()> {
        for batch in batches {
            self.save(batch).await?;
        }
        Ok(())
    }
}

// Blanket implementation for all BatchRepository implementations
impl<T: BatchRepository + ?Sized> BatchRepositoryExt for T {}
