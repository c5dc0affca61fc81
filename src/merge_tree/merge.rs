//! Greedy pairwise merge
//!
//! Min-heap keyed by (weight, id). Lower id wins among equal weights,
//! which makes the trace reproducible.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::tree::{NodeRecord, TreeSnapshot};
use crate::value::{IdCounter, NodeId, Value};

/// One merge of the two lightest items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeStep {
    /// First item extracted
    pub left_id: NodeId,
    /// Second item extracted
    pub right_id: NodeId,
    /// Synthesized parent (weight = sum of both)
    pub parent: NodeRecord,
}

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    weight: f64,
    id: NodeId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Merge `leaves` until one item remains.
///
/// Parents draw ids from `ids`, continuing the leaf sequence. Returns the
/// merge steps and the final tree (nodes in id order).
pub(crate) fn merge_trace(
    leaves: Vec<(NodeRecord, f64)>,
    ids: &mut IdCounter,
) -> (Vec<MergeStep>, TreeSnapshot) {
    if leaves.is_empty() {
        return (Vec::new(), TreeSnapshot::empty());
    }

    let mut heap = BinaryHeap::with_capacity(leaves.len());
    let mut nodes: BTreeMap<NodeId, NodeRecord> = BTreeMap::new();
    for (node, weight) in leaves {
        heap.push(Reverse(HeapEntry {
            weight,
            id: node.id,
        }));
        nodes.insert(node.id, node);
    }

    let mut steps = Vec::with_capacity(heap.len().saturating_sub(1));
    while heap.len() >= 2 {
        let (Some(Reverse(left)), Some(Reverse(right))) = (heap.pop(), heap.pop()) else {
            break;
        };

        let parent = NodeRecord {
            id: ids.next_id(),
            value: Value::Float(left.weight + right.weight),
            left: Some(left.id),
            right: Some(right.id),
        };
        heap.push(Reverse(HeapEntry {
            weight: left.weight + right.weight,
            id: parent.id,
        }));
        trace!(
            left = left.id,
            right = right.id,
            parent = parent.id,
            "merge step"
        );

        nodes.insert(parent.id, parent.clone());
        steps.push(MergeStep {
            left_id: left.id,
            right_id: right.id,
            parent,
        });
    }

    let root = heap.peek().map(|Reverse(entry)| entry.id);
    let snapshot = TreeSnapshot {
        root,
        nodes: nodes.into_values().collect(),
    };
    (steps, snapshot)
}
