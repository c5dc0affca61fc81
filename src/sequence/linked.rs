//! Singly linked sequence backing
//!
//! Nodes live in a map keyed by id and point at their successor by id,
//! so a snapshot is produced by walking from `head`.

use std::collections::HashMap;

use tracing::debug;

use super::{check_delete_index, check_element_index, check_insert_index, check_unique_ids};
use super::{Cell, Sequence};
use crate::value::{IdCounter, NodeId, Value};
use crate::VizError;

#[derive(Debug, Clone)]
struct ListNode {
    value: Value,
    next: Option<NodeId>,
}

/// Singly linked list with stable node ids
#[derive(Debug, Clone, Default)]
pub struct LinkedListModel {
    ids: IdCounter,
    head: Option<NodeId>,
    nodes: HashMap<NodeId, ListNode>,
    length: usize,
}

impl LinkedListModel {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            ids: IdCounter::new(),
            head: None,
            nodes: HashMap::new(),
            length: 0,
        }
    }

    /// Id of the first node
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// Successor of `id`, `None` at the tail or for unknown ids.
    pub fn next_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.next)
    }

    /// Ids visited walking from head up to and including `index`.
    pub fn walk(&self, index: usize) -> Result<Vec<NodeId>, VizError> {
        check_element_index(index, self.length)?;
        let mut path = Vec::with_capacity(index + 1);
        let mut current = self.head;
        while let Some(id) = current {
            path.push(id);
            if path.len() > index {
                break;
            }
            current = self.next_of(id);
        }
        Ok(path)
    }

    fn node_id_at(&self, index: usize) -> Result<NodeId, VizError> {
        self.walk(index)?
            .last()
            .copied()
            .ok_or(VizError::IndexOutOfRange {
                index,
                len: self.length,
            })
    }

    fn link_after(&mut self, prev: NodeId, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(&prev) {
            node.next = Some(id);
        }
    }
}

impl Sequence for LinkedListModel {
    fn len(&self) -> usize {
        self.length
    }

    fn get(&self, index: usize) -> Option<Cell> {
        let id = self.node_id_at(index).ok()?;
        self.nodes.get(&id).map(|node| Cell {
            id,
            value: node.value.clone(),
        })
    }

    fn clear(&mut self) {
        self.head = None;
        self.nodes.clear();
        self.length = 0;
        self.ids.reset();
    }

    fn create_from_sequence<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.clear();
        let mut prev: Option<NodeId> = None;
        for value in values {
            let id = self.ids.next_id();
            self.nodes.insert(
                id,
                ListNode {
                    value: value.into(),
                    next: None,
                },
            );
            match prev {
                Some(p) => self.link_after(p, id),
                None => self.head = Some(id),
            }
            prev = Some(id);
            self.length += 1;
        }
        debug!(len = self.length, "list created from sequence");
    }

    fn insert(&mut self, index: usize, value: Value) -> Result<NodeId, VizError> {
        check_insert_index(index, self.length)?;
        let prev = if index == 0 {
            None
        } else {
            Some(self.node_id_at(index - 1)?)
        };

        let id = self.ids.next_id();
        let next = match prev {
            Some(p) => self.next_of(p),
            None => self.head,
        };
        self.nodes.insert(id, ListNode { value, next });
        match prev {
            Some(p) => self.link_after(p, id),
            None => self.head = Some(id),
        }
        self.length += 1;
        debug!(id, index, "list insert");
        Ok(id)
    }

    fn delete(&mut self, index: usize) -> Result<Cell, VizError> {
        check_delete_index(index, self.length)?;
        let removed_id = self.node_id_at(index)?;
        let successor = self.next_of(removed_id);

        if index == 0 {
            self.head = successor;
        } else {
            let prev = self.node_id_at(index - 1)?;
            if let Some(node) = self.nodes.get_mut(&prev) {
                node.next = successor;
            }
        }

        let removed = self
            .nodes
            .remove(&removed_id)
            .ok_or(VizError::IndexOutOfRange {
                index,
                len: self.length,
            })?;
        self.length -= 1;
        debug!(id = removed_id, index, "list delete");
        Ok(Cell {
            id: removed_id,
            value: removed.value,
        })
    }

    fn update_value(&mut self, index: usize, value: Value) -> Result<NodeId, VizError> {
        let id = self.node_id_at(index)?;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.value = value;
        }
        debug!(id, index, "list update");
        Ok(id)
    }

    fn append(&mut self, value: Value) -> NodeId {
        let id = self.ids.next_id();
        self.nodes.insert(id, ListNode { value, next: None });
        if self.length == 0 {
            self.head = Some(id);
        } else if let Ok(tail) = self.node_id_at(self.length - 1) {
            self.link_after(tail, id);
        }
        self.length += 1;
        id
    }

    fn snapshot(&self) -> Vec<Cell> {
        let mut ordered = Vec::with_capacity(self.length);
        let mut current = self.head;
        while let Some(id) = current {
            let Some(node) = self.nodes.get(&id) else {
                break;
            };
            ordered.push(Cell {
                id,
                value: node.value.clone(),
            });
            current = node.next;
        }
        ordered
    }

    fn load_snapshot(&mut self, snapshot: &[Cell]) -> Result<(), VizError> {
        check_unique_ids(snapshot)?;
        self.ids.resume_after(snapshot.iter().map(|cell| cell.id))?;
        self.head = snapshot.first().map(|cell| cell.id);
        self.nodes = snapshot
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let next = snapshot.get(i + 1).map(|c| c.id);
                (
                    cell.id,
                    ListNode {
                        value: cell.value.clone(),
                        next,
                    },
                )
            })
            .collect();
        self.length = snapshot.len();
        debug!(len = self.length, "list loaded from snapshot");
        Ok(())
    }
}
