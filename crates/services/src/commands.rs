//! Commands accepted by the allocation service.

use chrono::NaiveDate;
use common::{BatchReference, OrderId, Sku};
use domain::OrderLine;

/// Command to register a new batch.
#[derive(Debug, Clone)]
pub struct AddBatch {
    /// The reference of the new batch.
    pub reference: BatchReference,

    /// The SKU the batch holds.
    pub sku: Sku,

    /// Units purchased.
    pub quantity: u32,

    /// Expected arrival; None when already in stock.
    pub eta: Option<NaiveDate>,
}

impl AddBatch {
    /// Creates a new AddBatch command.
    pub fn new(
        reference: impl Into<BatchReference>,
        sku: impl Into<Sku>,
        quantity: u32,
        eta: Option<NaiveDate>,
    ) -> Self {
        Self {
            reference: reference.into(),
            sku: sku.into(),
            quantity,
            eta,
        }
    }

    /// Creates a new AddBatch command with a generated reference.
    pub fn generated(sku: impl Into<Sku>, quantity: u32, eta: Option<NaiveDate>) -> Self {
        Self::new(BatchReference::generate(), sku, quantity, eta)
    }
}

/// Command to allocate an order line to the best available batch.
#[derive(Debug, Clone)]
pub struct Allocate {
    pub orderid: OrderId,
    pub sku: Sku,
    pub qty: u32,
}

impl Allocate {
    /// Creates a new Allocate command.
    pub fn new(orderid: impl Into<OrderId>, sku: impl Into<Sku>, qty: u32) -> Self {
        Self {
            orderid: orderid.into(),
            sku: sku.into(),
            qty,
        }
    }

    /// Returns the order line this command asks for.
    pub fn line(&self) -> OrderLine {
        OrderLine::new(self.orderid.clone(), self.sku.clone(), self.qty)
    }
}

/// Command to release an order line from a specific batch.
#[derive(Debug, Clone)]
pub struct Deallocate {
    /// The batch the line was allocated to.
    pub reference: BatchReference,

    pub orderid: OrderId,
    pub sku: Sku,
    pub qty: u32,
}

impl Deallocate {
    /// Creates a new Deallocate command.
    pub fn new(
        reference: impl Into<BatchReference>,
        orderid: impl Into<OrderId>,
        sku: impl Into<Sku>,
        qty: u32,
    ) -> Self {
        Self {
            reference: reference.into(),
            orderid: orderid.into(),
            sku: sku.into(),
            qty,
        }
    }

    /// Returns the order line this command releases.
    pub fn line(&self) -> OrderLine {
        OrderLine::new(self.orderid.clone(), self.sku.clone(), self.qty)
    }
}
