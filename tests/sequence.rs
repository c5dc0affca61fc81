use dsviz::{ArrayModel, Cell, LinkedListModel, Sequence, StackModel, Value, VizError};
use proptest::prelude::*;
use test_case::test_case;

mod common;
use common::ints;

fn values<S: Sequence>(seq: &S) -> Vec<Value> {
    seq.snapshot().into_iter().map(|cell| cell.value).collect()
}

fn ids<S: Sequence>(seq: &S) -> Vec<u64> {
    seq.snapshot().into_iter().map(|cell| cell.id).collect()
}

fn identity_survives_edits<S: Sequence + Default>() {
    let mut seq = S::default();
    seq.create_from_sequence([10, 20, 30]);
    assert_eq!(ids(&seq), vec![0, 1, 2]);

    let inserted = seq.insert(1, Value::Int(15)).unwrap();
    assert_eq!(inserted, 3);
    assert_eq!(ids(&seq), vec![0, 3, 1, 2]);

    let removed = seq.delete(0).unwrap();
    assert_eq!(removed, Cell::new(0, 10));
    assert_eq!(ids(&seq), vec![3, 1, 2]);

    let updated = seq.update_value(2, Value::from("thirty")).unwrap();
    assert_eq!(updated, 2);
    assert_eq!(
        values(&seq),
        vec![Value::Int(15), Value::Int(20), Value::from("thirty")]
    );

    // ids are never reused, even after a delete
    assert_eq!(seq.append(Value::Int(40)), 4);
}

#[test]
fn array_identity_survives_edits() {
    identity_survives_edits::<ArrayModel>();
}

#[test]
fn linked_list_identity_survives_edits() {
    identity_survives_edits::<LinkedListModel>();
}

#[test_case(0, 3 => matches Ok(_) ; "front")]
#[test_case(3, 3 => matches Ok(_) ; "end")]
#[test_case(4, 3 => matches Err(VizError::IndexOutOfRange { index: 4, len: 3 }) ; "past end")]
fn insert_bounds(index: usize, len: i64) -> Result<u64, VizError> {
    let mut array = ArrayModel::new();
    array.create_from_sequence(1..=len);
    let mut list = LinkedListModel::new();
    list.create_from_sequence(1..=len);

    let a = array.insert(index, Value::Int(0));
    let l = list.insert(index, Value::Int(0));
    assert_eq!(a, l);
    assert_eq!(array.snapshot(), list.snapshot());
    a
}

#[test_case(&[], 0 => matches Err(VizError::EmptyCollection) ; "empty")]
#[test_case(&[1, 2], 2 => matches Err(VizError::IndexOutOfRange { index: 2, len: 2 }) ; "past end")]
#[test_case(&[1, 2], 1 => matches Ok(_) ; "last")]
fn delete_bounds(start: &[i64], index: usize) -> Result<Cell, VizError> {
    let mut array = ArrayModel::new();
    array.create_from_sequence(start.iter().copied());
    let mut list = LinkedListModel::new();
    list.create_from_sequence(start.iter().copied());

    let a = array.delete(index);
    assert_eq!(a, list.delete(index));
    a
}

#[test]
fn update_out_of_range_on_empty() {
    let mut list = LinkedListModel::new();
    assert_eq!(
        list.update_value(0, Value::Int(1)),
        Err(VizError::IndexOutOfRange { index: 0, len: 0 })
    );
}

#[test]
fn linked_list_walk_visits_prefix() {
    let mut list = LinkedListModel::new();
    list.create_from_sequence(["a", "b", "c", "d"]);
    list.delete(1).unwrap();
    assert_eq!(list.walk(2).unwrap(), vec![0, 2, 3]);
    assert_eq!(list.head(), Some(0));
    assert_eq!(list.next_of(0), Some(2));
    assert!(list.walk(3).is_err());
}

#[test]
fn load_snapshot_resumes_ids() {
    let snapshot = vec![Cell::new(7, 1), Cell::new(2, 2)];
    let mut array = ArrayModel::new();
    array.load_snapshot(&snapshot).unwrap();
    assert_eq!(array.append(Value::Int(3)), 8);

    let mut list = LinkedListModel::new();
    list.load_snapshot(&snapshot).unwrap();
    assert_eq!(list.snapshot(), snapshot);
    assert_eq!(list.append(Value::Int(3)), 8);
}

#[test]
fn duplicate_ids_rejected_without_change() {
    let mut array = ArrayModel::new();
    array.create_from_sequence([1, 2]);
    let before = array.snapshot();
    let err = array
        .load_snapshot(&[Cell::new(1, 1), Cell::new(1, 2)])
        .unwrap_err();
    assert!(matches!(err, VizError::CorruptSnapshot(_)));
    assert_eq!(array.snapshot(), before);
}

#[test]
fn id_at_limit_leaves_models_unchanged() {
    let snapshot = [Cell::new(1, "a"), Cell::new(u64::MAX, "b")];

    let mut array = ArrayModel::new();
    array.create_from_sequence([5]);
    assert!(matches!(
        array.load_snapshot(&snapshot),
        Err(VizError::CorruptSnapshot(_))
    ));
    assert_eq!(array.snapshot(), vec![Cell::new(0, 5)]);

    let mut list = LinkedListModel::new();
    list.create_from_sequence([5]);
    assert!(list.load_snapshot(&snapshot).is_err());
    assert_eq!(list.snapshot(), vec![Cell::new(0, 5)]);
    assert_eq!(list.append(Value::Int(6)), 1);

    let mut stack = StackModel::new();
    assert!(stack.load_snapshot(&snapshot).is_err());
    assert!(stack.is_empty());
}

#[test]
fn stack_pop_history_and_ids() {
    let mut stack = StackModel::new();
    stack.create_from_sequence([1, 2, 3]);
    assert_eq!(stack.pop().unwrap().id, 2);
    assert_eq!(stack.pop().unwrap().id, 1);
    assert_eq!(stack.push(9), 3);
    assert_eq!(stack.peek().map(|c| c.value.clone()), Some(Value::Int(9)));
    assert_eq!(stack.popped_history(), &ints(&[3, 2])[..]);

    stack.clear();
    assert_eq!(stack.pop(), Err(VizError::EmptyCollection));
    assert!(stack.popped_history().is_empty());
}

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, i64),
    Delete(usize),
    Update(usize, i64),
    Append(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..12, any::<i64>()).prop_map(|(i, v)| Op::Insert(i, v)),
        (0usize..12).prop_map(Op::Delete),
        (0usize..12, any::<i64>()).prop_map(|(i, v)| Op::Update(i, v)),
        any::<i64>().prop_map(Op::Append),
    ]
}

proptest! {
    #[test]
    fn backings_agree_with_vec(start in proptest::collection::vec(any::<i64>(), 0..8),
                               ops in proptest::collection::vec(op(), 0..40)) {
        let mut array = ArrayModel::new();
        array.create_from_sequence(start.iter().copied());
        let mut list = LinkedListModel::new();
        list.create_from_sequence(start.iter().copied());
        let mut reference = start.clone();

        for op in ops {
            match op {
                Op::Insert(i, v) => {
                    let a = array.insert(i, Value::Int(v));
                    prop_assert_eq!(&a, &list.insert(i, Value::Int(v)));
                    if a.is_ok() {
                        reference.insert(i, v);
                    }
                }
                Op::Delete(i) => {
                    let a = array.delete(i);
                    prop_assert_eq!(&a, &list.delete(i));
                    if a.is_ok() {
                        reference.remove(i);
                    }
                }
                Op::Update(i, v) => {
                    let a = array.update_value(i, Value::Int(v));
                    prop_assert_eq!(&a, &list.update_value(i, Value::Int(v)));
                    if a.is_ok() {
                        reference[i] = v;
                    }
                }
                Op::Append(v) => {
                    prop_assert_eq!(array.append(Value::Int(v)), list.append(Value::Int(v)));
                    reference.push(v);
                }
            }
            prop_assert_eq!(array.snapshot(), list.snapshot());
        }

        prop_assert_eq!(values(&array), ints(&reference));
        let mut seen = ids(&list);
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), reference.len());
    }
}
