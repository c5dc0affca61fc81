//! Node record shared by BST and merge-tree snapshots
//!
//! A record is flat: children are referenced by id, never owned, so a
//! snapshot is just a list of records plus a root id.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Direction;
use crate::value::{NodeId, Value};

/// One node of a tree snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Stable node id
    pub id: NodeId,

    /// Key (BST) or accumulated weight (merge tree)
    pub value: Value,

    /// Left child id
    pub left: Option<NodeId>,

    /// Right child id
    pub right: Option<NodeId>,
}

impl NodeRecord {
    /// Childless record
    pub fn leaf(id: NodeId, value: impl Into<Value>) -> Self {
        Self {
            id,
            value: value.into(),
            left: None,
            right: None,
        }
    }

    /// Check if leaf (no children present)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Child on the given side
    #[inline]
    pub fn child(&self, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Present children, left first
    pub fn children(&self) -> impl Iterator<Item = NodeId> {
        self.left.into_iter().chain(self.right)
    }
}

impl fmt::Display for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}({})", self.id, self.value)
    }
}
