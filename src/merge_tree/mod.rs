//! Merge-tree process builder
//!
//! Builds the "repeatedly merge the two lightest items" tree (Huffman
//! construction) and records everything a player needs to replay it:
//!
//! 1. `initial`: the surviving leaves, in input order
//! 2. `sorting`: every move of a stable insertion sort by weight
//! 3. `building`: every merge, in order
//! 4. `final_tree`: the resulting tree, same shape as a BST snapshot
//!
//! Non-positive weights are filtered out, not rejected.

mod merge;
mod sort;

pub use merge::MergeStep;
pub use sort::SortStep;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tree::{NodeRecord, TreeSnapshot};
use crate::value::{IdCounter, NodeId, Value};
use crate::VizError;

/// Complete replay trace of one build
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BuildProcess {
    /// Leaves in input order
    pub initial: Vec<NodeRecord>,
    /// Insertion-sort moves
    pub sorting: Vec<SortStep>,
    /// Pairwise merges
    pub building: Vec<MergeStep>,
    /// Tree after the last merge
    pub final_tree: TreeSnapshot,
}

impl BuildProcess {
    /// True when no positive weight survived filtering
    pub fn is_empty(&self) -> bool {
        self.initial.is_empty()
    }

    /// Root weight (sum of all surviving weights)
    pub fn total_weight(&self) -> Option<f64> {
        self.final_tree.root_node().and_then(|node| node.value.as_f64())
    }

    /// Stable replay identity: blake3 of the JSON encoding, hex encoded.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}

/// Builder owning the id counter shared by leaves and parents
///
/// The counter continues across builds on the same instance, so a
/// renderer never sees an id reused between two successive builds.
#[derive(Debug, Clone, Default)]
pub struct MergeTreeBuilder {
    ids: IdCounter,
}

impl MergeTreeBuilder {
    /// Builder whose first id is 0
    pub fn new() -> Self {
        Self {
            ids: IdCounter::new(),
        }
    }

    /// Id the next created node will receive
    pub fn next_id(&self) -> NodeId {
        self.ids.peek()
    }

    /// Restart ids at 0
    pub fn clear(&mut self) {
        self.ids.reset();
    }

    /// Run the whole process for `raw_values`.
    ///
    /// Every value is coerced to a float weight; text that does not parse
    /// as a finite number is an error and consumes no ids, as is a set of
    /// weights whose total overflows. Weights `<= 0` are dropped.
    pub fn build_process<I>(&mut self, raw_values: I) -> Result<BuildProcess, VizError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let weights = raw_values
            .into_iter()
            .map(|raw| raw.into().weight())
            .collect::<Result<Vec<f64>, VizError>>()?;
        let input_len = weights.len();
        let weights: Vec<f64> = weights.into_iter().filter(|w| *w > 0.0).collect();

        if weights.is_empty() {
            debug!(input_len, "merge tree build had no positive weights");
            return Ok(BuildProcess::default());
        }
        let total: f64 = weights.iter().sum();
        if !total.is_finite() {
            return Err(VizError::InvalidValue(format!(
                "weights sum past the float range ({})",
                total
            )));
        }

        let leaves: Vec<(NodeRecord, f64)> = weights
            .into_iter()
            .map(|w| (NodeRecord::leaf(self.ids.next_id(), w), w))
            .collect();
        let initial: Vec<NodeRecord> = leaves.iter().map(|(node, _)| node.clone()).collect();

        let (sorting, sorted) = sort::insertion_sort_trace(leaves);
        let (building, final_tree) = merge::merge_trace(sorted, &mut self.ids);

        debug!(
            input_len,
            leaves = initial.len(),
            sort_steps = sorting.len(),
            merges = building.len(),
            root = ?final_tree.root,
            "merge tree built"
        );

        Ok(BuildProcess {
            initial,
            sorting,
            building,
            final_tree,
        })
    }
}

/// Build with a fresh builder: identical input, identical trace.
pub fn build_process<I>(raw_values: I) -> Result<BuildProcess, VizError>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    MergeTreeBuilder::new().build_process(raw_values)
}
