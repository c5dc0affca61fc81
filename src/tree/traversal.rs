//! Snapshot traversals
//!
//! All traversals use an explicit stack or queue so a degenerate
//! (list-shaped) tree of any height is safe. Ids that are referenced
//! but absent, or already visited, are skipped.

use std::collections::{HashMap, HashSet, VecDeque};

use super::{NodeRecord, TreeSnapshot};
use crate::value::NodeId;

/// Which child slot a descent took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Smaller keys / first merged item
    Left,

    /// Larger keys / second merged item
    Right,
}

pub(crate) fn index_nodes(snapshot: &TreeSnapshot) -> HashMap<NodeId, &NodeRecord> {
    snapshot.nodes.iter().map(|node| (node.id, node)).collect()
}

/// Left subtree, node, right subtree
pub fn in_order(snapshot: &TreeSnapshot) -> Vec<NodeId> {
    in_order_with_depth(snapshot)
        .into_iter()
        .map(|(id, _)| id)
        .collect()
}

/// In-order ids paired with their depth (root = 0).
pub fn in_order_with_depth(snapshot: &TreeSnapshot) -> Vec<(NodeId, usize)> {
    let nodes = index_nodes(snapshot);
    let mut order = Vec::with_capacity(nodes.len());
    let mut visited = HashSet::with_capacity(nodes.len());
    let mut stack: Vec<(NodeId, usize)> = Vec::new();
    let mut current = snapshot.root.map(|id| (id, 0));

    loop {
        while let Some((id, depth)) = current {
            let Some(node) = nodes.get(&id) else {
                break;
            };
            if !visited.insert(id) {
                break;
            }
            stack.push((id, depth));
            current = node.left.map(|left| (left, depth + 1));
        }
        let Some((id, depth)) = stack.pop() else {
            break;
        };
        order.push((id, depth));
        current = nodes
            .get(&id)
            .and_then(|node| node.right)
            .map(|right| (right, depth + 1));
    }

    order
}

/// Breadth-first, left before right
pub fn level_order(snapshot: &TreeSnapshot) -> Vec<NodeId> {
    let nodes = index_nodes(snapshot);
    let mut order = Vec::with_capacity(nodes.len());
    let mut visited = HashSet::with_capacity(nodes.len());
    let mut queue: VecDeque<NodeId> = snapshot.root.into_iter().collect();

    while let Some(id) = queue.pop_front() {
        let Some(node) = nodes.get(&id) else {
            continue;
        };
        if !visited.insert(id) {
            continue;
        }
        order.push(id);
        queue.extend(node.children());
    }

    order
}

/// Depth of every reachable node (root = 0)
pub fn depths(snapshot: &TreeSnapshot) -> HashMap<NodeId, usize> {
    in_order_with_depth(snapshot).into_iter().collect()
}

/// Number of levels (0 for an empty tree)
pub fn height(snapshot: &TreeSnapshot) -> usize {
    in_order_with_depth(snapshot)
        .into_iter()
        .map(|(_, depth)| depth + 1)
        .max()
        .unwrap_or(0)
}
