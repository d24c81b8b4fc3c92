use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Batch, OrderLine};
use repository::{BatchReference, BatchRepository, InMemoryBatchRepository, Sku};

fn populated_repo(count: usize) -> InMemoryBatchRepository {
    InMemoryBatchRepository::with_batches((0..count).map(|i| {
        let sku = if i % 2 == 0 { "SKU-EVEN" } else { "SKU-ODD" };
        Batch::new(format!("batch-{i:05}"), sku, 1_000, None)
    }))
}

fn bench_get(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = populated_repo(1_000);
    let reference = BatchReference::new("batch-00500");

    c.bench_function("repository/memory_get", |b| {
        b.to_async(&rt)
            .iter(|| async { repo.get(&reference).await.unwrap() });
    });
}

fn bench_list_for_sku(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = populated_repo(1_000);
    let sku = Sku::new("SKU-EVEN");

    c.bench_function("repository/memory_list_for_sku_1000", |b| {
        b.to_async(&rt)
            .iter(|| async { repo.list_for_sku(&sku).await.unwrap() });
    });
}

fn bench_save(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let repo = populated_repo(1_000);
    let mut batch = Batch::new("batch-00500", "SKU-EVEN", 1_000, None);
    batch.allocate(&OrderLine::new("order-1", "SKU-EVEN", 5));

    c.bench_function("repository/memory_save", |b| {
        b.to_async(&rt)
            .iter(|| async { repo.save(&batch).await.unwrap() });
    });
}

criterion_group!(benches, bench_get, bench_list_for_sku, bench_save);
criterion_main!(benches);
