//! Contiguous sequence backing

use tracing::debug;

use super::{check_delete_index, check_element_index, check_insert_index, check_unique_ids};
use super::{Cell, Sequence};
use crate::value::{IdCounter, NodeId, Value};
use crate::VizError;

/// Array-backed sequence with stable element ids
#[derive(Debug, Clone, Default)]
pub struct ArrayModel {
    ids: IdCounter,
    items: Vec<Cell>,
}

impl ArrayModel {
    /// Create an empty array
    pub fn new() -> Self {
        Self {
            ids: IdCounter::new(),
            items: Vec::new(),
        }
    }

    /// Id the next created element will receive
    pub fn next_id(&self) -> NodeId {
        self.ids.peek()
    }

    /// Position of the element with `id`, if present.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.items.iter().position(|cell| cell.id == id)
    }

    /// Last element, if any
    pub fn last(&self) -> Option<&Cell> {
        self.items.last()
    }

    fn new_cell(&mut self, value: Value) -> Cell {
        Cell {
            id: self.ids.next_id(),
            value,
        }
    }
}

impl Sequence for ArrayModel {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<Cell> {
        self.items.get(index).cloned()
    }

    fn clear(&mut self) {
        self.items.clear();
        self.ids.reset();
    }

    fn create_from_sequence<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.clear();
        for value in values {
            let cell = self.new_cell(value.into());
            self.items.push(cell);
        }
        debug!(len = self.items.len(), "array created from sequence");
    }

    fn insert(&mut self, index: usize, value: Value) -> Result<NodeId, VizError> {
        check_insert_index(index, self.items.len())?;
        let cell = self.new_cell(value);
        let id = cell.id;
        self.items.insert(index, cell);
        debug!(id, index, "array insert");
        Ok(id)
    }

    fn delete(&mut self, index: usize) -> Result<Cell, VizError> {
        check_delete_index(index, self.items.len())?;
        let removed = self.items.remove(index);
        debug!(id = removed.id, index, "array delete");
        Ok(removed)
    }

    fn update_value(&mut self, index: usize, value: Value) -> Result<NodeId, VizError> {
        check_element_index(index, self.items.len())?;
        let cell = &mut self.items[index];
        cell.value = value;
        debug!(id = cell.id, index, "array update");
        Ok(cell.id)
    }

    fn append(&mut self, value: Value) -> NodeId {
        let cell = self.new_cell(value);
        let id = cell.id;
        self.items.push(cell);
        id
    }

    fn snapshot(&self) -> Vec<Cell> {
        self.items.clone()
    }

    fn load_snapshot(&mut self, snapshot: &[Cell]) -> Result<(), VizError> {
        check_unique_ids(snapshot)?;
        self.ids.resume_after(snapshot.iter().map(|cell| cell.id))?;
        self.items = snapshot.to_vec();
        debug!(len = self.items.len(), "array loaded from snapshot");
        Ok(())
    }
}
