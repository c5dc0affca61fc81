use std::collections::BTreeSet;

use dsviz::{BstModel, TreeSnapshot};
use proptest::prelude::*;

mod common;
use common::{assert_search_order, bst_from};

#[derive(Debug, Clone)]
enum Op {
    Insert(i64),
    Delete(i64),
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            3 => (-50i64..50).prop_map(Op::Insert),
            2 => (-50i64..50).prop_map(Op::Delete),
        ],
        0..80,
    )
}

proptest! {
    #[test]
    fn ordering_survives_any_mutation_sequence(ops in ops()) {
        let mut bst = BstModel::new();
        let mut reference = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(v) => {
                    bst.insert(v).unwrap();
                    reference.insert(v);
                }
                Op::Delete(v) => {
                    let outcome = bst.delete(v).unwrap();
                    prop_assert_eq!(outcome.found.is_some(), reference.remove(&v));
                }
            }
            let snapshot = bst.snapshot();
            prop_assert!(snapshot.validate().is_ok());
            assert_search_order(&snapshot);
            prop_assert_eq!(bst.len(), reference.len());
        }
    }

    #[test]
    fn issued_ids_are_unique_and_increasing(ops in ops()) {
        let mut bst = BstModel::new();
        let mut last: Option<u64> = None;

        for op in ops {
            match op {
                Op::Insert(v) => {
                    let ins = bst.insert(v).unwrap();
                    if ins.created {
                        if let Some(prev) = last {
                            prop_assert!(ins.id > prev, "id {} issued after {}", ins.id, prev);
                        }
                        last = Some(ins.id);
                    }
                }
                Op::Delete(v) => {
                    bst.delete(v).unwrap();
                }
            }
        }
    }

    #[test]
    fn deleting_absent_key_reports_find_path(
        keys in proptest::collection::btree_set(-100i64..100, 0..30),
        probe in -100i64..100,
    ) {
        prop_assume!(!keys.contains(&probe));
        let keys: Vec<i64> = keys.into_iter().collect();
        let mut bst = bst_from(&keys);
        let before = bst.snapshot();

        let expected = bst.find(probe).unwrap();
        let outcome = bst.delete(probe).unwrap();
        prop_assert_eq!(outcome.found, None);
        prop_assert_eq!(outcome.path, expected.path);
        prop_assert_eq!(bst.snapshot(), before);
    }

    #[test]
    fn snapshot_round_trips(ops in ops()) {
        let mut bst = BstModel::new();
        for op in ops {
            match op {
                Op::Insert(v) => { bst.insert(v).unwrap(); }
                Op::Delete(v) => { bst.delete(v).unwrap(); }
            }
        }
        let snapshot = bst.snapshot();
        let mut restored = BstModel::new();
        restored.load_snapshot(&snapshot).unwrap();
        prop_assert_eq!(restored.snapshot(), snapshot);
    }
}

#[test]
fn find_example_path() {
    let bst = bst_from(&[8, 3, 10, 1, 6]);
    let ids = |v: i64| bst.find(v).unwrap().found.unwrap();

    let outcome = bst.find(6).unwrap();
    assert_eq!(outcome.path, vec![ids(8), ids(3), ids(6)]);
    assert_eq!(outcome.path.last().copied(), outcome.found);
}

#[test]
fn duplicate_insert_is_idempotent() {
    let mut bst = bst_from(&[8, 3, 10]);
    let first = bst.insert(6).unwrap();
    let count = bst.len();
    let second = bst.insert(6).unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.id, second.id);
    assert_eq!(bst.len(), count);
}

#[test]
fn deleting_root_with_two_children_promotes_successor() {
    let mut bst = bst_from(&[50, 30, 70, 60, 80, 65]);
    let root = bst.root().unwrap();
    let successor = bst.find(60).unwrap().found.unwrap();

    let outcome = bst.delete(50).unwrap();
    assert_eq!(outcome.found, Some(root));
    assert_eq!(outcome.path.last().copied(), Some(successor));
    assert_eq!(bst.root(), Some(successor));
    assert_search_order(&bst.snapshot());
}

#[test]
fn snapshot_is_independent_copy() {
    let bst = bst_from(&[2, 1, 3]);
    let mut snapshot: TreeSnapshot = bst.snapshot();
    snapshot.nodes.clear();
    snapshot.root = None;
    assert_eq!(bst.snapshot().len(), 3);
}

#[test]
fn large_integer_keys_stay_distinct_from_floats() {
    let two_53 = 1i64 << 53;
    let mut bst = bst_from(&[two_53, two_53 + 1]);

    let hit = bst.find(two_53 as f64).unwrap();
    assert_eq!(hit.found, Some(0));

    // the float equal to 2^53 is a duplicate of id 0 only
    let again = bst.insert(two_53 as f64).unwrap();
    assert!(!again.created);
    assert_eq!(again.id, 0);

    assert_eq!(bst.find(two_53 + 1).unwrap().found, Some(1));
    let above = bst.insert(two_53 as f64 + 2.0).unwrap();
    assert!(above.created);
    assert_eq!(above.path, vec![0, 1]);
    assert_eq!(bst.in_order(), vec![0, 1, above.id]);
}
