use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::Batch;
use tokio::sync::RwLock;

use crate::{BatchReference, RepositoryError, Result, Sku, store::BatchRepository};

/// In-memory batch repository.
///
/// Batches are kept in a map keyed by reference and handed out as clones,
/// so a caller's mutations only land here through `save`. Clones of the
/// repository share the same map.
#[derive(Clone, Default)]
pub struct InMemoryBatchRepository {
    batches: Arc<RwLock<HashMap<BatchReference, Batch>>>,
}

impl InMemoryBatchRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with batches.
    ///
    /// Later batches with a duplicate reference replace earlier ones.
    pub fn with_batches(batches: impl IntoIterator<Item = Batch>) -> Self {
        let map = batches
            .into_iter()
            .map(|batch| (batch.reference().clone(), batch))
            .collect();
        Self {
            batches: Arc::new(RwLock::new(map)),
        }
    }

    /// Returns the number of stored batches.
    pub async fn len(&self) -> usize {
        self.batches.read().await.len()
    }

    /// Returns true if no batches are stored.
    pub async fn is_empty(&self) -> bool {
        self.batches.read().await.is_empty()
    }

    /// Removes every batch.
    pub async fn clear(&self) {
        self.batches.write().await.clear();
    }
}

fn sorted_by_reference(mut batches: Vec<Batch>) -> Vec<Batch> {
    batches.sort_by(|a, b| a.reference().cmp(b.reference()));
    batches
}

#[async_trait]
impl BatchRepository for InMemoryBatchRepository {
    async fn add(&self, batch: Batch) -> Result<()> {
        let mut store = self.batches.write().await;

        if store.contains_key(batch.reference()) {
            return Err(RepositoryError::DuplicateBatch(batch.reference().clone()));
        }

        tracing::debug!(reference = %batch.reference(), sku = %batch.sku(), "adding batch");
        store.insert(batch.reference().clone(), batch);
        Ok(())
    }

    async fn get(&self, reference: &BatchReference) -> Result<Option<Batch>> {
        Ok(self.batches.read().await.get(reference).cloned())
    }

    async fn list(&self) -> Result<Vec<Batch>> {
        let store = self.batches.read().await;
        Ok(sorted_by_reference(store.values().cloned().collect()))
    }

    async fn list_for_sku(&self, sku: &Sku) -> Result<Vec<Batch>> {
        let store = self.batches.read().await;
        Ok(sorted_by_reference(
            store
                .values()
                .filter(|batch| batch.sku() == sku)
                .cloned()
                .collect(),
        ))
    }

    async fn save(&self, batch: &Batch) -> Result<()> {
        let mut store = self.batches.write().await;

        let Some(stored) = store.get_mut(batch.reference()) else {
            return Err(RepositoryError::BatchNotFound(batch.reference().clone()));
        };

        *stored = batch.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, Utc};
    use domain::OrderLine;

    use super::*;
    use crate::store::BatchRepositoryExt;

    fn batch(reference: &str, sku: &str, qty: u32) -> Batch {
        Batch::new(reference, sku, qty, None)
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let repo = InMemoryBatchRepository::new();
        let eta = Utc::now().date_naive().checked_add_days(Days::new(2));
        repo.add(Batch::new("batch1", "RUSTY-SOAPDISH", 100, eta))
            .await
            .unwrap();

        let loaded = repo
            .get(&BatchReference::new("batch1"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(loaded.sku().as_str(), "RUSTY-SOAPDISH");
        assert_eq!(loaded.purchased_quantity(), 100);
        assert_eq!(loaded.eta(), eta);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = InMemoryBatchRepository::new();
        let result = repo.get(&BatchReference::new("nope")).await.unwrap();
        assert!(result.is_none());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_add_duplicate_reference_fails() {
        let repo = InMemoryBatchRepository::new();
        repo.add(batch("batch1", "LAMP", 10)).await.unwrap();

        let result = repo.add(batch("batch1", "DESK", 5)).await;

        assert!(matches!(result, Err(RepositoryError::DuplicateBatch(_))));
        let stored = repo.get_existing(&"batch1".into()).await.unwrap();
        assert_eq!(stored.sku().as_str(), "LAMP");
    }

    #[tokio::test]
    async fn test_repeated_loads_compare_equal() {
        let repo = InMemoryBatchRepository::new();
        repo.add(batch("batch1", "LAMP", 10)).await.unwrap();

        let a = repo.get_existing(&"batch1".into()).await.unwrap();
        let b = repo.get_existing(&"batch1".into()).await.unwrap();

        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_mutations_need_save() {
        let repo = InMemoryBatchRepository::new();
        repo.add(batch("batch1", "LAMP", 10)).await.unwrap();
        let line = OrderLine::new("order1", "LAMP", 4);

        let mut loaded = repo.get_existing(&"batch1".into()).await.unwrap();
        loaded.allocate(&line);

        let before_save = repo.get_existing(&"batch1".into()).await.unwrap();
        assert_eq!(before_save.available_quantity(), 10);

        repo.save(&loaded).await.unwrap();
        let after_save = repo.get_existing(&"batch1".into()).await.unwrap();
        assert_eq!(after_save.available_quantity(), 6);
        assert!(after_save.is_allocated(&line));
    }

    #[tokio::test]
    async fn test_save_unknown_batch_fails() {
        let repo = InMemoryBatchRepository::new();
        let result = repo.save(&batch("ghost", "LAMP", 1)).await;
        assert!(matches!(result, Err(RepositoryError::BatchNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_filterable() {
        let repo = InMemoryBatchRepository::with_batches([
            batch("c", "LAMP", 1),
            batch("a", "LAMP", 1),
            batch("b", "DESK", 1),
        ]);

        let all: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .map(|b| b.reference().to_string())
            .collect();
        assert_eq!(all, ["a", "b", "c"]);

        let lamps: Vec<String> = repo
            .list_for_sku(&Sku::new("LAMP"))
            .await
            .unwrap()
            .iter()
            .map(|b| b.reference().to_string())
            .collect();
        assert_eq!(lamps, ["a", "c"]);
    }

    #[tokio::test]
    async fn test_exists_and_clear() {
        let repo = InMemoryBatchRepository::new();
        repo.add(batch("batch1", "LAMP", 10)).await.unwrap();
        assert!(repo.exists(&"batch1".into()).await.unwrap());

        repo.clear().await;
        assert!(!repo.exists(&"batch1".into()).await.unwrap());
        assert!(matches!(
            repo.get_existing(&"batch1".into()).await,
            Err(RepositoryError::BatchNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = InMemoryBatchRepository::new();
        let clone = repo.clone();
        clone.add(batch("batch1", "LAMP", 10)).await.unwrap();
        assert_eq!(repo.len().await, 1);
    }
}
