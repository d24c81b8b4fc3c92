//! Integration tests for the allocation model.
//!
//! These tests drive batches through several allocations and
//! deallocations using only the public API of the crate.

use chrono::{Days, NaiveDate, Utc};
use domain::{Batch, DomainError, OrderLine, allocate, allocation_priority};

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn in_days(days: u64) -> Option<NaiveDate> {
    today().checked_add_days(Days::new(days))
}

mod batch_state {
    use super::*;

    #[test]
    fn lamp_scenario() {
        let mut batch = Batch::new("b1", "LAMP", 20, None);
        let line = OrderLine::new("o1", "LAMP", 2);

        assert!(batch.can_allocate(&line));
        batch.allocate(&line);
        assert_eq!(batch.available_quantity(), 18);
    }

    #[test]
    fn chair_never_fits_toaster_line() {
        let batch = Batch::new("b1", "CHAIR", 100, None);
        assert!(!batch.can_allocate(&OrderLine::new("o1", "TOASTER", 10)));
        assert!(!batch.can_allocate(&OrderLine::new("o1", "TOASTER", 1)));
    }

    #[test]
    fn can_allocate_matches_sku_and_quantity_rule() {
        let batch = Batch::new("b1", "LAMP", 10, in_days(1));
        for qty in 0..=15 {
            for sku in ["LAMP", "DESK"] {
                let line = OrderLine::new("o1", sku, qty);
                let expected = sku == "LAMP" && qty <= 10;
                assert_eq!(batch.can_allocate(&line), expected, "sku={sku} qty={qty}");
            }
        }
    }

    #[test]
    fn allocate_then_deallocate_cycle() {
        let mut batch = Batch::new("b1", "LAMP", 10, None);
        let first = OrderLine::new("o1", "LAMP", 6);
        let second = OrderLine::new("o2", "LAMP", 6);

        batch.allocate(&first);
        batch.allocate(&second);
        assert_eq!(batch.available_quantity(), 4);
        assert!(!batch.is_allocated(&second));

        batch.deallocate(&first);
        batch.allocate(&second);
        assert_eq!(batch.available_quantity(), 4);
        assert!(batch.is_allocated(&second));
        assert!(!batch.is_allocated(&first));
    }

    #[test]
    fn serialized_batch_keeps_identity_and_allocations() {
        let mut batch = Batch::new("b1", "LAMP", 10, in_days(2));
        batch.allocate(&OrderLine::new("o1", "LAMP", 3));

        let json = serde_json::to_string(&batch).unwrap();
        let decoded: Batch = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded, batch);
        assert_eq!(decoded.available_quantity(), 7);
        assert_eq!(decoded.eta(), batch.eta());
    }
}

mod selection {
    use super::*;

    #[test]
    fn exhaustion_reports_sku() {
        let mut batches = vec![Batch::new("b1", "SMALL-FORK", 10, None)];

        allocate(&OrderLine::new("o1", "SMALL-FORK", 10), &mut batches).unwrap();
        let err = allocate(&OrderLine::new("o2", "SMALL-FORK", 10), &mut batches).unwrap_err();

        match err {
            DomainError::OutOfStock(sku) => assert_eq!(sku.as_str(), "SMALL-FORK"),
            other => panic!("expected OutOfStock, got {other:?}"),
        }
    }

    #[test]
    fn successive_lines_drain_batches_in_priority_order() {
        let mut batches = vec![
            Batch::new("late", "SPOON", 10, in_days(10)),
            Batch::new("warehouse", "SPOON", 10, None),
            Batch::new("soon", "SPOON", 10, in_days(1)),
        ];

        let refs: Vec<String> = (0..3)
            .map(|i| {
                let line = OrderLine::new(format!("order-{i}"), "SPOON", 10);
                allocate(&line, &mut batches).unwrap().into_inner()
            })
            .collect();

        assert_eq!(refs, ["warehouse", "soon", "late"]);
        assert!(batches.iter().all(|b| b.available_quantity() == 0));
        assert!(allocate(&OrderLine::new("order-3", "SPOON", 1), &mut batches).is_err());
    }

    #[test]
    fn priority_sort_puts_in_stock_first() {
        let mut batches = [
            Batch::new("c", "SPOON", 1, in_days(3)),
            Batch::new("a", "SPOON", 1, None),
            Batch::new("b", "SPOON", 1, in_days(1)),
        ];
        batches.sort_by(allocation_priority);

        let order: Vec<&str> = batches.iter().map(|b| b.reference().as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn deallocation_frees_stock_for_the_next_line() {
        let mut batches = vec![Batch::new("b1", "SPOON", 10, None)];
        let first = OrderLine::new("o1", "SPOON", 10);

        allocate(&first, &mut batches).unwrap();
        batches[0].deallocate(&first);

        let batchref = allocate(&OrderLine::new("o2", "SPOON", 10), &mut batches).unwrap();
        assert_eq!(batchref.as_str(), "b1");
    }
}
