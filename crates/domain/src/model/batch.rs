//! Batch entity.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use common::{BatchReference, Sku};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::model::OrderLine;
use crate::operand::{Operand, OperandKind};

/// A purchased lot of a single SKU, either in stock or on its way.
///
/// Identity is the `reference`: two batches are equal exactly when their
/// references are equal, regardless of quantities or allocations. `Hash`
/// agrees with that, so a batch can key a map or live in a set.
///
/// Allocation state changes only through [`Batch::allocate`] and
/// [`Batch::deallocate`]. Both are silent when they have nothing to do.
///
/// Decoding checks what `allocate` would have enforced: every allocated
/// line is for the batch's SKU and the lines fit in the purchased quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BatchData")]
pub struct Batch {
    reference: BatchReference,
    sku: Sku,
    purchased_quantity: u32,
    eta: Option<NaiveDate>,
    #[serde(default)]
    allocations: BTreeSet<OrderLine>,
}

impl Batch {
    /// Creates a batch with no allocations.
    ///
    /// `eta` is `None` for stock already in the warehouse.
    pub fn new(
        reference: impl Into<BatchReference>,
        sku: impl Into<Sku>,
        purchased_quantity: u32,
        eta: Option<NaiveDate>,
    ) -> Self {
        Self {
            reference: reference.into(),
            sku: sku.into(),
            purchased_quantity,
            eta,
            allocations: BTreeSet::new(),
        }
    }

    /// Rebuilds a batch from stored state.
    ///
    /// The allocations are taken as-is, without re-running
    /// `can_allocate`; callers load them from a store that only ever saw
    /// allocations made through [`Batch::allocate`].
    pub fn restore(
        reference: impl Into<BatchReference>,
        sku: impl Into<Sku>,
        purchased_quantity: u32,
        eta: Option<NaiveDate>,
        allocations: impl IntoIterator<Item = OrderLine>,
    ) -> Self {
        Self {
            reference: reference.into(),
            sku: sku.into(),
            purchased_quantity,
            eta,
            allocations: allocations.into_iter().collect(),
        }
    }

    pub fn reference(&self) -> &BatchReference {
        &self.reference
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn eta(&self) -> Option<NaiveDate> {
        self.eta
    }

    pub fn purchased_quantity(&self) -> u32 {
        self.purchased_quantity
    }

    /// Returns true when the batch is already in physical stock.
    pub fn is_in_stock(&self) -> bool {
        self.eta.is_none()
    }

    /// Returns the allocated order lines, in a stable order.
    pub fn allocations(&self) -> impl Iterator<Item = &OrderLine> {
        self.allocations.iter()
    }

    /// Returns true if this exact line is allocated to this batch.
    pub fn is_allocated(&self, line: &OrderLine) -> bool {
        self.allocations.contains(line)
    }

    /// Sum of the quantities of all allocated lines, saturating at `u32::MAX`.
    pub fn allocated_quantity(&self) -> u32 {
        u32::try_from(self.allocated_total()).unwrap_or(u32::MAX)
    }

    /// Purchased quantity minus allocated quantity.
    pub fn available_quantity(&self) -> u32 {
        let allocated = self.allocated_total().min(u64::from(self.purchased_quantity));
        self.purchased_quantity - allocated as u32
    }

    fn allocated_total(&self) -> u64 {
        self.allocations
            .iter()
            .map(|line| u64::from(line.qty()))
            .sum()
    }

    /// Returns true iff the line is for this SKU and fits in what is left.
    pub fn can_allocate(&self, line: &OrderLine) -> bool {
        self.sku == *line.sku() && self.available_quantity() >= line.qty()
    }

    /// Allocates the line if it fits; otherwise does nothing.
    ///
    /// Allocating the same line twice has no additional effect.
    pub fn allocate(&mut self, line: &OrderLine) {
        if self.can_allocate(line) {
            self.allocations.insert(line.clone());
        }
    }

    /// Removes the line if it is allocated here; otherwise does nothing.
    pub fn deallocate(&mut self, line: &OrderLine) {
        self.allocations.remove(line);
    }

    /// Orders this batch by allocated quantity against another batch's
    /// allocated quantity or against a bare integer.
    pub fn compare_allocated(&self, other: Operand<&Batch>) -> Ordering {
        let allocated = i128::from(self.allocated_total());
        match other {
            Operand::Int(n) => allocated.cmp(&i128::from(n)),
            Operand::Same(batch) => allocated.cmp(&i128::from(batch.allocated_total())),
        }
    }
}

/// Wire form of a batch, validated into a [`Batch`] on decode.
#[derive(Deserialize)]
struct BatchData {
    reference: BatchReference,
    sku: Sku,
    purchased_quantity: u32,
    eta: Option<NaiveDate>,
    #[serde(default)]
    allocations: BTreeSet<OrderLine>,
}

impl TryFrom<BatchData> for Batch {
    type Error = DomainError;

    fn try_from(data: BatchData) -> Result<Self, Self::Error> {
        let invalid = |reason: String| DomainError::InvalidBatch {
            reference: data.reference.clone(),
            reason,
        };

        if let Some(line) = data.allocations.iter().find(|line| *line.sku() != data.sku) {
            return Err(invalid(format!(
                "allocation for order {} is for sku {}, not {}",
                line.orderid(),
                line.sku(),
                data.sku
            )));
        }

        let allocated: u64 = data.allocations.iter().map(|line| u64::from(line.qty())).sum();
        if allocated > u64::from(data.purchased_quantity) {
            return Err(invalid(format!(
                "allocated {allocated} exceeds purchased {}",
                data.purchased_quantity
            )));
        }

        Ok(Batch::restore(
            data.reference,
            data.sku,
            data.purchased_quantity,
            data.eta,
            data.allocations,
        ))
    }
}

impl PartialEq for Batch {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Eq for Batch {}

impl Hash for Batch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
    }
}

impl OperandKind for Batch {
    const NAME: &'static str = "Batch";
}
