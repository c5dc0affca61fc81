#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dsviz::{BstModel, TreeSnapshot, Value};

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("DSVIZ_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set DSVIZ_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n").trim_end().to_string()
}

/// Tree built by inserting `values` in order.
pub fn bst_from(values: &[i64]) -> BstModel {
    let mut bst = BstModel::new();
    bst.create_from_sequence(values.iter().copied())
        .expect("integer keys are accepted");
    bst
}

/// Assert left < node < right for every node of a snapshot.
pub fn assert_search_order(snapshot: &TreeSnapshot) {
    let ids = dsviz::tree::traversal::in_order(snapshot);
    assert_eq!(ids.len(), snapshot.len(), "every node reachable in order");
    let keys: Vec<f64> = ids
        .iter()
        .map(|&id| {
            snapshot
                .get(id)
                .and_then(|node| node.value.as_f64())
                .expect("numeric key")
        })
        .collect();
    for pair in keys.windows(2) {
        assert!(pair[0] < pair[1], "keys out of order: {:?}", keys);
    }
}

pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&v| Value::Int(v)).collect()
}
