//! Batch entity and order line value object.

mod batch;
mod order_line;

pub use batch::Batch;
pub use order_line::OrderLine;
