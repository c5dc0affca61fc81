//! Insertion-sort trace over the leaf list
//!
//! Stable: an element only moves past strictly heavier elements, so
//! equal weights keep their input order.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::tree::NodeRecord;
use crate::value::NodeId;

/// One move made by the insertion sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortStep {
    /// Ids in their order just before this move
    pub array_before: Vec<NodeId>,
    /// Element being moved
    pub key_id: NodeId,
    /// Where it was
    pub from_index: usize,
    /// Where it goes
    pub insert_index: usize,
}

/// Sort `(record, weight)` pairs ascending, recording every move.
///
/// Elements already in place emit nothing.
pub(crate) fn insertion_sort_trace(
    mut items: Vec<(NodeRecord, f64)>,
) -> (Vec<SortStep>, Vec<(NodeRecord, f64)>) {
    let mut steps = Vec::new();

    for i in 1..items.len() {
        let key_weight = items[i].1;
        let mut j = i;
        while j > 0 && items[j - 1].1 > key_weight {
            j -= 1;
        }
        if j == i {
            continue;
        }

        let step = SortStep {
            array_before: items.iter().map(|(node, _)| node.id).collect(),
            key_id: items[i].0.id,
            from_index: i,
            insert_index: j,
        };
        trace!(key_id = step.key_id, from = i, to = j, "sort step");
        steps.push(step);

        let key = items.remove(i);
        items.insert(j, key);
    }

    (steps, items)
}
