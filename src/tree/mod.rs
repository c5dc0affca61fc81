//! Tree snapshots
//!
//! The BST model and the merge-tree builder both hand out the same
//! flat shape: a root id plus an unordered list of node records. The
//! layout engines only ever consume this shape.
//!
//! Snapshots coming from outside (a saved document, a caller) are
//! checked with [`TreeSnapshot::validate`] before any model adopts them.

mod node;
pub mod traversal;

pub use node::NodeRecord;
pub use traversal::Direction;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::value::NodeId;
use crate::VizError;

/// Independent copy of a tree's structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// Root id, `None` for an empty tree
    pub root: Option<NodeId>,

    /// Every node, in no particular order
    pub nodes: Vec<NodeRecord>,
}

impl TreeSnapshot {
    /// Snapshot of an empty tree
    pub fn empty() -> Self {
        Self {
            root: None,
            nodes: Vec::new(),
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Record for `id` (linear scan)
    pub fn get(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Root record, if any
    pub fn root_node(&self) -> Option<&NodeRecord> {
        self.root.and_then(|id| self.get(id))
    }

    /// Check that the snapshot describes exactly one tree.
    ///
    /// Rejects duplicate ids, a root missing from `nodes`, nodes without
    /// a root, dangling child ids, a node with two parents, a root that
    /// is also somebody's child, cycles and unreachable nodes.
    pub fn validate(&self) -> Result<(), VizError> {
        let mut by_id: HashMap<NodeId, &NodeRecord> = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if by_id.insert(node.id, node).is_some() {
                return Err(corrupt(format!("duplicate node id {}", node.id)));
            }
        }

        let root = match self.root {
            None if self.nodes.is_empty() => return Ok(()),
            None => {
                return Err(corrupt(format!(
                    "{} nodes but no root",
                    self.nodes.len()
                )))
            }
            Some(root) if !by_id.contains_key(&root) => {
                return Err(corrupt(format!("root {} is not among the nodes", root)))
            }
            Some(root) => root,
        };

        let mut parent_of: HashMap<NodeId, NodeId> = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            for child in node.children() {
                if !by_id.contains_key(&child) {
                    return Err(corrupt(format!(
                        "node {} references missing child {}",
                        node.id, child
                    )));
                }
                if child == root {
                    return Err(corrupt(format!("root {} appears as a child", root)));
                }
                if let Some(other) = parent_of.insert(child, node.id) {
                    return Err(corrupt(format!(
                        "node {} has two parents ({} and {})",
                        child, other, node.id
                    )));
                }
            }
        }

        // With unique parents and a parentless root, anything not reached
        // from the root is either detached or sits on a cycle.
        let mut reached = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !reached.insert(id) {
                return Err(corrupt(format!("cycle through node {}", id)));
            }
            if let Some(node) = by_id.get(&id) {
                stack.extend(node.children());
            }
        }
        if reached.len() != self.nodes.len() {
            let mut stray: Vec<NodeId> = by_id
                .keys()
                .filter(|id| !reached.contains(*id))
                .copied()
                .collect();
            stray.sort_unstable();
            return Err(corrupt(format!("unreachable nodes {:?}", stray)));
        }

        Ok(())
    }
}

fn corrupt(reason: String) -> VizError {
    tracing::warn!(%reason, "rejecting tree snapshot");
    VizError::CorruptSnapshot(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn node(id: NodeId, left: Option<NodeId>, right: Option<NodeId>) -> NodeRecord {
        NodeRecord {
            id,
            value: Value::Int(id as i64),
            left,
            right,
        }
    }

    fn assert_corrupt(snapshot: TreeSnapshot) {
        assert!(matches!(
            snapshot.validate(),
            Err(VizError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn test_valid_tree() {
        let snapshot = TreeSnapshot {
            root: Some(1),
            nodes: vec![node(0, None, None), node(1, Some(0), Some(2)), node(2, None, None)],
        };
        assert!(snapshot.validate().is_ok());
        assert!(TreeSnapshot::empty().validate().is_ok());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        assert_corrupt(TreeSnapshot {
            root: Some(0),
            nodes: vec![node(0, None, None), node(0, None, None)],
        });
    }

    #[test]
    fn test_rejects_dangling_child() {
        assert_corrupt(TreeSnapshot {
            root: Some(0),
            nodes: vec![node(0, Some(7), None)],
        });
    }

    #[test]
    fn test_rejects_bad_root() {
        assert_corrupt(TreeSnapshot {
            root: Some(3),
            nodes: vec![node(0, None, None)],
        });
        assert_corrupt(TreeSnapshot {
            root: None,
            nodes: vec![node(0, None, None)],
        });
    }

    #[test]
    fn test_rejects_shared_child() {
        assert_corrupt(TreeSnapshot {
            root: Some(0),
            nodes: vec![
                node(0, Some(1), Some(2)),
                node(1, Some(3), None),
                node(2, Some(3), None),
                node(3, None, None),
            ],
        });
    }

    #[test]
    fn test_rejects_detached_cycle() {
        assert_corrupt(TreeSnapshot {
            root: Some(0),
            nodes: vec![node(0, None, None), node(1, Some(2), None), node(2, Some(1), None)],
        });
    }

    #[test]
    fn test_rejects_self_loop() {
        assert_corrupt(TreeSnapshot {
            root: Some(0),
            nodes: vec![node(0, Some(1), None), node(1, None, Some(1))],
        });
    }
}
