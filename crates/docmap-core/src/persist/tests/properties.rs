use crate::{
    persist::{UpdateOperator, index_diff},
    test_support::{Harness, PROFILE},
    value::{Document, Value},
    wire::WireValue,
};
use proptest::prelude::*;

fn score_update(old: i64, new: i64) -> Option<WireValue> {
    let mut h = Harness::new();
    let doc = Document::new(PROFILE).with("score", new);
    h.ledger.record_change(&doc, "score", old, new);

    h.persister()
        .compile_update(&doc)
        .expect("in-range increments compile")
        .get(UpdateOperator::Inc, "score")
        .cloned()
}

proptest! {
    #[test]
    fn increment_is_the_signed_difference(
        old in -1_000_000_000_i64..1_000_000_000,
        new in -1_000_000_000_i64..1_000_000_000,
    ) {
        let inc = score_update(old, new);

        if old == new {
            prop_assert_eq!(inc, None);
        } else {
            prop_assert_eq!(inc, Some(WireValue::Int(new - old)));
        }
    }

    #[test]
    fn index_diff_only_reports_changed_positions(
        old in prop::collection::vec(0_i64..4, 0..8),
        new in prop::collection::vec(0_i64..4, 0..8),
    ) {
        let old: Vec<Value> = old.into_iter().map(Value::Int).collect();
        let new: Vec<Value> = new.into_iter().map(Value::Int).collect();

        let diff = index_diff(&old, &new);
        let unchanged = old.iter().zip(&new).filter(|(a, b)| a == b).count();

        prop_assert_eq!(diff.deleted.len(), old.len() - unchanged);
        prop_assert_eq!(diff.inserted.len(), new.len() - unchanged);
        prop_assert!(index_diff(&new, &new).is_empty());
    }
}
