//! Order line value object.

use common::{OrderId, Sku};
use serde::{Deserialize, Serialize};

/// A request to withdraw `qty` units of `sku` for order `orderid`.
///
/// Order lines are values: two lines are equal when all three fields are
/// equal, and a line never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderLine {
    orderid: OrderId,
    sku: Sku,
    qty: u32,
}

impl OrderLine {
    /// Creates a new order line.
    ///
    /// A zero quantity is representable here; the service layer rejects it.
    pub fn new(orderid: impl Into<OrderId>, sku: impl Into<Sku>, qty: u32) -> Self {
        Self {
            orderid: orderid.into(),
            sku: sku.into(),
            qty,
        }
    }

    pub fn orderid(&self) -> &OrderId {
        &self.orderid
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn qty(&self) -> u32 {
        self.qty
    }
}
