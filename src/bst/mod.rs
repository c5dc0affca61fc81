//! Binary search tree model
//!
//! Nodes are stored flat, keyed by id, with children referenced by id.
//! Every search-like operation records the ids it visits so a renderer
//! can replay the descent.
//!
//! Invariant: left subtree keys < node key < right subtree keys.
//! Equal keys never create a second node.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::tree::{self, Direction, NodeRecord, TreeSnapshot};
use crate::value::{IdCounter, NodeId, Value};
use crate::VizError;

/// Result of [`BstModel::insert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// New node id, or the existing node holding an equal key
    pub id: NodeId,

    /// Existing nodes visited, root first
    pub path: Vec<NodeId>,

    /// False when an equal key was already present
    pub created: bool,
}

/// Result of [`BstModel::find`] and [`BstModel::delete`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Matched (or removed) node
    pub found: Option<NodeId>,

    /// Nodes visited, root first
    pub path: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct BstNode {
    value: Value,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl BstNode {
    fn slot_mut(&mut self, direction: Direction) -> &mut Option<NodeId> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

/// Where a descent stopped
struct Descent {
    path: Vec<NodeId>,
    /// Matched node
    found: Option<NodeId>,
    /// Parent of the match (or of the empty slot) and the side taken
    parent: Option<(NodeId, Direction)>,
}

/// Identity-tracked binary search tree
#[derive(Debug, Clone, Default)]
pub struct BstModel {
    ids: IdCounter,
    nodes: BTreeMap<NodeId, BstNode>,
    root: Option<NodeId>,
}

impl BstModel {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            ids: IdCounter::new(),
            nodes: BTreeMap::new(),
            root: None,
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root id
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Key stored at `id`
    pub fn value_of(&self, id: NodeId) -> Option<&Value> {
        self.nodes.get(&id).map(|node| &node.value)
    }

    /// Whether an equal key is present
    pub fn contains(&self, value: impl Into<Value>) -> Result<bool, VizError> {
        Ok(self.find(value)?.found.is_some())
    }

    /// Number of levels (0 when empty)
    pub fn height(&self) -> usize {
        tree::traversal::height(&self.snapshot())
    }

    /// Ids in ascending key order
    pub fn in_order(&self) -> Vec<NodeId> {
        tree::traversal::in_order(&self.snapshot())
    }

    /// Drop all nodes; ids restart at 0.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.ids.reset();
    }

    /// Clear, then insert every value in order.
    ///
    /// All values are checked first: one non-numeric value rejects the
    /// whole batch and leaves the tree untouched.
    pub fn create_from_sequence<I>(&mut self, values: I) -> Result<(), VizError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        for value in &values {
            value.require_numeric()?;
        }
        self.clear();
        for value in values {
            self.insert(value)?;
        }
        debug!(len = self.nodes.len(), "bst created from sequence");
        Ok(())
    }

    /// Insert a key.
    ///
    /// The path lists the existing nodes compared against. An equal key
    /// stops the descent and its node is returned with `created = false`.
    pub fn insert(&mut self, value: impl Into<Value>) -> Result<Insertion, VizError> {
        let value = value.into();
        value.require_numeric()?;
        let descent = self.descend(&value)?;

        if let Some(existing) = descent.found {
            debug!(id = existing, path_len = descent.path.len(), "bst insert hit existing key");
            return Ok(Insertion {
                id: existing,
                path: descent.path,
                created: false,
            });
        }

        let id = self.ids.next_id();
        self.nodes.insert(
            id,
            BstNode {
                value,
                left: None,
                right: None,
            },
        );
        self.relink(descent.parent, Some(id));
        debug!(id, path_len = descent.path.len(), "bst insert");

        Ok(Insertion {
            id,
            path: descent.path,
            created: true,
        })
    }

    /// Search for a key.
    ///
    /// On a hit the match is the last path entry; on a miss the path ends
    /// at the last node visited before falling off the tree.
    pub fn find(&self, value: impl Into<Value>) -> Result<SearchOutcome, VizError> {
        let value = value.into();
        value.require_numeric()?;
        let descent = self.descend(&value)?;
        Ok(SearchOutcome {
            found: descent.found,
            path: descent.path,
        })
    }

    /// Remove a key.
    ///
    /// A node with two children is replaced by its in-order successor;
    /// the successor search is appended to the path.
    pub fn delete(&mut self, value: impl Into<Value>) -> Result<SearchOutcome, VizError> {
        let value = value.into();
        value.require_numeric()?;
        let Descent {
            mut path,
            found,
            parent,
        } = self.descend(&value)?;

        let Some(target) = found else {
            debug!(path_len = path.len(), "bst delete missed");
            return Ok(SearchOutcome { found: None, path });
        };

        let (left, right) = match self.nodes.get(&target) {
            Some(node) => (node.left, node.right),
            None => return Err(self.missing(target)),
        };

        match (left, right) {
            (Some(left), Some(right)) => {
                let mut succ_parent = target;
                let mut succ = right;
                path.push(succ);
                while let Some(next) = self.nodes.get(&succ).and_then(|n| n.left) {
                    succ_parent = succ;
                    succ = next;
                    path.push(succ);
                }

                if succ_parent != target {
                    let succ_right = self.nodes.get(&succ).and_then(|n| n.right);
                    if let Some(node) = self.nodes.get_mut(&succ_parent) {
                        node.left = succ_right;
                    }
                    if let Some(node) = self.nodes.get_mut(&succ) {
                        node.right = Some(right);
                    }
                }
                if let Some(node) = self.nodes.get_mut(&succ) {
                    node.left = Some(left);
                }
                self.relink(parent, Some(succ));
            }
            (child, None) | (None, child) => self.relink(parent, child),
        }

        self.nodes.remove(&target);
        debug!(id = target, path_len = path.len(), "bst delete");
        Ok(SearchOutcome {
            found: Some(target),
            path,
        })
    }

    /// Independent copy of the structure, nodes in id order
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            root: self.root,
            nodes: self
                .nodes
                .iter()
                .map(|(&id, node)| NodeRecord {
                    id,
                    value: node.value.clone(),
                    left: node.left,
                    right: node.right,
                })
                .collect(),
        }
    }

    /// Replace the whole tree from a snapshot.
    ///
    /// The snapshot must be a single well-formed tree with numeric keys in
    /// strict search order; otherwise it is rejected and the model is left
    /// as it was.
    pub fn load_snapshot(&mut self, snapshot: &TreeSnapshot) -> Result<(), VizError> {
        snapshot.validate()?;
        for node in &snapshot.nodes {
            node.value.require_numeric().map_err(|_| {
                VizError::CorruptSnapshot(format!("node {} has non-numeric key {}", node.id, node.value))
            })?;
        }

        let by_id: BTreeMap<NodeId, &NodeRecord> =
            snapshot.nodes.iter().map(|node| (node.id, node)).collect();
        let ordered = tree::traversal::in_order(snapshot);
        for pair in ordered.windows(2) {
            let (a, b) = (&by_id[&pair[0]].value, &by_id[&pair[1]].value);
            if a.compare(b)? != Ordering::Less {
                return Err(VizError::CorruptSnapshot(format!(
                    "keys out of order: node {} ({}) before node {} ({})",
                    pair[0], a, pair[1], b
                )));
            }
        }

        self.ids.resume_after(snapshot.nodes.iter().map(|node| node.id))?;
        self.nodes = snapshot
            .nodes
            .iter()
            .map(|node| {
                (
                    node.id,
                    BstNode {
                        value: node.value.clone(),
                        left: node.left,
                        right: node.right,
                    },
                )
            })
            .collect();
        self.root = snapshot.root;
        debug!(len = self.nodes.len(), "bst loaded from snapshot");
        Ok(())
    }

    fn descend(&self, value: &Value) -> Result<Descent, VizError> {
        let mut path = Vec::new();
        let mut parent = None;
        let mut current = self.root;

        while let Some(id) = current {
            let node = self.nodes.get(&id).ok_or_else(|| self.missing(id))?;
            path.push(id);
            let direction = match value.compare(&node.value)? {
                Ordering::Equal => {
                    return Ok(Descent {
                        path,
                        found: Some(id),
                        parent,
                    })
                }
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
            };
            parent = Some((id, direction));
            current = match direction {
                Direction::Left => node.left,
                Direction::Right => node.right,
            };
        }

        Ok(Descent {
            path,
            found: None,
            parent,
        })
    }

    /// Point the parent's slot (or the root) at `child`.
    fn relink(&mut self, parent: Option<(NodeId, Direction)>, child: Option<NodeId>) {
        match parent {
            None => self.root = child,
            Some((parent_id, direction)) => {
                if let Some(node) = self.nodes.get_mut(&parent_id) {
                    *node.slot_mut(direction) = child;
                }
            }
        }
    }

    fn missing(&self, id: NodeId) -> VizError {
        VizError::CorruptSnapshot(format!("node {} referenced but not stored", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(values: &[i64]) -> BstModel {
        let mut bst = BstModel::new();
        bst.create_from_sequence(values.iter().copied()).unwrap();
        bst
    }

    fn keys_in_order(bst: &BstModel) -> Vec<Value> {
        bst.in_order()
            .into_iter()
            .filter_map(|id| bst.value_of(id).cloned())
            .collect()
    }

    #[test]
    fn test_insert_into_empty() {
        let mut bst = BstModel::new();
        let ins = bst.insert(8).unwrap();
        assert_eq!(ins.id, 0);
        assert!(ins.path.is_empty());
        assert!(ins.created);
        assert_eq!(bst.root(), Some(0));
    }

    #[test]
    fn test_find_path_includes_match() {
        let bst = built(&[8, 3, 10, 1, 6]);
        let found = bst.find(6).unwrap();
        assert_eq!(found.found, Some(4));
        assert_eq!(found.path, vec![0, 1, 4]);

        let miss = bst.find(7).unwrap();
        assert_eq!(miss.found, None);
        assert_eq!(miss.path, vec![0, 1, 4]);
    }

    #[test]
    fn test_duplicate_insert() {
        let mut bst = built(&[8, 3, 10]);
        let first = bst.insert(3).unwrap();
        assert_eq!(first.id, 1);
        assert!(!first.created);
        assert_eq!(first.path, vec![0, 1]);
        assert_eq!(bst.len(), 3);
    }

    #[test]
    fn test_delete_leaf_and_single_child() {
        let mut bst = built(&[8, 3, 10, 1, 14]);
        assert_eq!(bst.delete(1).unwrap().found, Some(3));
        let removed = bst.delete(10).unwrap();
        assert_eq!(removed.found, Some(2));
        assert_eq!(removed.path, vec![0, 2]);
        let snapshot = bst.snapshot();
        assert_eq!(snapshot.get(0).unwrap().right, Some(4));
        assert_eq!(keys_in_order(&bst), vec![Value::Int(3), Value::Int(8), Value::Int(14)]);
    }

    #[test]
    fn test_delete_two_children_deep_successor() {
        //        8
        //      /   \
        //     3     12
        //          /  \
        //        10    14
        //          \
        //           11
        let mut bst = built(&[8, 3, 12, 10, 14, 11]);
        let removed = bst.delete(8).unwrap();
        assert_eq!(removed.found, Some(0));
        assert_eq!(removed.path, vec![0, 2, 3]);

        assert_eq!(bst.root(), Some(3));
        let snapshot = bst.snapshot();
        let new_root = snapshot.get(3).unwrap();
        assert_eq!(new_root.left, Some(1));
        assert_eq!(new_root.right, Some(2));
        assert_eq!(snapshot.get(2).unwrap().left, Some(5));
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_delete_two_children_direct_successor() {
        let mut bst = built(&[5, 2, 8, 9]);
        let removed = bst.delete(5).unwrap();
        assert_eq!(removed.path, vec![0, 2]);
        assert_eq!(bst.root(), Some(2));
        let snapshot = bst.snapshot();
        let root = snapshot.get(2).unwrap();
        assert_eq!((root.left, root.right), (Some(1), Some(3)));
    }

    #[test]
    fn test_delete_missing_matches_find() {
        let mut bst = built(&[8, 3, 10, 1, 6]);
        let expected = bst.find(7).unwrap();
        let outcome = bst.delete(7).unwrap();
        assert_eq!(outcome, expected);
        assert_eq!(bst.len(), 5);
    }

    #[test]
    fn test_text_key_rejected() {
        let mut bst = built(&[1]);
        assert!(matches!(bst.insert("x"), Err(VizError::InvalidValue(_))));
        assert!(bst.find("x").is_err());
        assert!(bst.create_from_sequence([Value::Int(2), Value::from("y")]).is_err());
        assert_eq!(bst.len(), 1);
    }

    #[test]
    fn test_mixed_numeric_keys() {
        let mut bst = built(&[3]);
        assert!(!bst.insert(3.0).unwrap().created);
        assert!(bst.insert(2.5).unwrap().created);
        assert_eq!(bst.value_of(1), Some(&Value::Float(2.5)));
    }

    #[test]
    fn test_load_snapshot_rejects_disorder() {
        let mut bst = BstModel::new();
        let bad = TreeSnapshot {
            root: Some(0),
            nodes: vec![
                NodeRecord {
                    left: Some(1),
                    ..NodeRecord::leaf(0, 5)
                },
                NodeRecord::leaf(1, 9),
            ],
        };
        assert!(matches!(bst.load_snapshot(&bad), Err(VizError::CorruptSnapshot(_))));
        assert!(bst.is_empty());
    }

    #[test]
    fn test_load_snapshot_resumes_ids() {
        let source = built(&[4, 2, 6]);
        let mut bst = BstModel::new();
        bst.load_snapshot(&source.snapshot()).unwrap();
        assert_eq!(bst.snapshot(), source.snapshot());
        assert_eq!(bst.insert(5).unwrap().id, 3);
    }

    #[test]
    fn test_clear_restarts_ids() {
        let mut bst = built(&[1, 2]);
        bst.clear();
        assert_eq!(bst.root(), None);
        assert_eq!(bst.insert(7).unwrap().id, 0);
    }

    #[test]
    fn test_height() {
        assert_eq!(built(&[]).height(), 0);
        assert_eq!(built(&[2, 1, 3]).height(), 2);
        assert_eq!(built(&[1, 2, 3, 4]).height(), 4);
    }
}
