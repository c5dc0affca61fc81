//! LIFO model
//!
//! A stack is an array that only grows and shrinks at its top. Popped
//! values are kept, in pop order, so a renderer can show the output row
//! and a saved document can restore it.

use tracing::debug;

use crate::sequence::{ArrayModel, Cell, Sequence};
use crate::value::{NodeId, Value};
use crate::VizError;

/// Identity-tracked stack
#[derive(Debug, Clone, Default)]
pub struct StackModel {
    items: ArrayModel,
    popped: Vec<Value>,
}

impl StackModel {
    /// Create an empty stack
    pub fn new() -> Self {
        Self {
            items: ArrayModel::new(),
            popped: Vec::new(),
        }
    }

    /// Number of elements on the stack
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the stack is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Push onto the top; returns the new element's id.
    pub fn push(&mut self, value: impl Into<Value>) -> NodeId {
        let id = self.items.append(value.into());
        debug!(id, depth = self.items.len(), "stack push");
        id
    }

    /// Pop the top element.
    pub fn pop(&mut self) -> Result<Cell, VizError> {
        let top = self.items.len().checked_sub(1).ok_or(VizError::EmptyCollection)?;
        let cell = self.items.delete(top)?;
        self.popped.push(cell.value.clone());
        debug!(id = cell.id, depth = self.items.len(), "stack pop");
        Ok(cell)
    }

    /// Top element without removing it
    pub fn peek(&self) -> Option<&Cell> {
        self.items.last()
    }

    /// Clear, then push every value bottom to top.
    pub fn create_from_sequence<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.items.create_from_sequence(values);
        self.popped.clear();
    }

    /// Values popped so far, oldest first
    pub fn popped_history(&self) -> &[Value] {
        &self.popped
    }

    /// Replace the popped history (used when restoring a document).
    pub fn set_popped_history(&mut self, history: Vec<Value>) {
        self.popped = history;
    }

    /// Drop all elements and history; ids restart at 0.
    pub fn clear(&mut self) {
        self.items.clear();
        self.popped.clear();
    }

    /// Bottom-to-top copy
    pub fn snapshot(&self) -> Vec<Cell> {
        self.items.snapshot()
    }

    /// Replace the element list from a snapshot; history is untouched.
    pub fn load_snapshot(&mut self, snapshot: &[Cell]) -> Result<(), VizError> {
        self.items.load_snapshot(snapshot)
    }
}
