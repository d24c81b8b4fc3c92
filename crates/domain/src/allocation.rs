//! Batch selection: which batch should fulfil an order line.

use std::cmp::Ordering;

use common::BatchReference;

use crate::error::{DomainError, Result};
use crate::model::{Batch, OrderLine};

/// Priority between two candidate batches.
///
/// Batches already in stock come first, then shipments by ascending ETA.
pub fn allocation_priority(a: &Batch, b: &Batch) -> Ordering {
    // `None < Some(_)` puts in-stock batches ahead of any shipment.
    a.eta().cmp(&b.eta())
}

/// Allocates `line` to the highest-priority batch that can take it.
///
/// Candidates are sorted with [`allocation_priority`] (stable, so equal
/// ETAs keep the caller's order) and scanned in that order. The first batch
/// whose `can_allocate` holds is allocated and its reference returned.
/// Batches of other SKUs are skipped.
///
/// Fails with [`DomainError::OutOfStock`] when no batch qualifies; in that
/// case nothing is mutated. Each call is independent: a line already
/// allocated somewhere is not special-cased.
pub fn allocate<'a, I>(line: &OrderLine, batches: I) -> Result<BatchReference>
where
    I: IntoIterator<Item = &'a mut Batch>,
{
    let mut candidates: Vec<&mut Batch> = batches.into_iter().collect();
    candidates.sort_by(|a, b| allocation_priority(a, b));

    let Some(batch) = candidates
        .into_iter()
        .find(|batch| batch.can_allocate(line))
    else {
        tracing::warn!(
            orderid = %line.orderid(),
            sku = %line.sku(),
            qty = line.qty(),
            "no batch can satisfy order line"
        );
        return Err(DomainError::OutOfStock(line.sku().clone()));
    };

    batch.allocate(line);
    tracing::debug!(
        orderid = %line.orderid(),
        sku = %line.sku(),
        qty = line.qty(),
        batchref = %batch.reference(),
        available = batch.available_quantity(),
        "allocated order line"
    );

    Ok(batch.reference().clone())
}
