//! Identity-tracked ordered collections
//!
//! Two backings share one contract:
//! - [`ArrayModel`]: contiguous storage, O(1) positional access
//! - [`LinkedListModel`]: head pointer plus per-node `next` id
//!
//! Positions are never stored on elements; they are whatever index
//! an element currently sits at in `snapshot()`.

mod array;
mod linked;

pub use array::ArrayModel;
pub use linked::LinkedListModel;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::value::{NodeId, Value};
use crate::VizError;

/// One element of a sequence snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Stable element id
    pub id: NodeId,
    /// Current value
    pub value: Value,
}

impl Cell {
    /// Construct a cell
    pub fn new(id: NodeId, value: impl Into<Value>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}

/// Operations common to every sequence backing
pub trait Sequence {
    /// Number of elements
    fn len(&self) -> usize;

    /// Whether the sequence holds no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, if any
    fn get(&self, index: usize) -> Option<Cell>;

    /// Drop everything and restart ids at 0
    fn clear(&mut self);

    /// Clear, then append every value in order with fresh ids.
    fn create_from_sequence<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>;

    /// Insert at `index` ∈ [0, len]; returns the new id.
    fn insert(&mut self, index: usize, value: Value) -> Result<NodeId, VizError>;

    /// Remove the element at `index` ∈ [0, len).
    fn delete(&mut self, index: usize) -> Result<Cell, VizError>;

    /// Replace the value at `index` in place; returns the (unchanged) id.
    fn update_value(&mut self, index: usize, value: Value) -> Result<NodeId, VizError>;

    /// Insert at the end
    fn append(&mut self, value: Value) -> NodeId;

    /// Independent front-to-back copy
    fn snapshot(&self) -> Vec<Cell>;

    /// Replace all state from a prior snapshot.
    ///
    /// Rejects duplicate ids; the id counter resumes past the largest id.
    fn load_snapshot(&mut self, snapshot: &[Cell]) -> Result<(), VizError>;
}

/// Reject snapshots that reuse an id.
pub(crate) fn check_unique_ids(snapshot: &[Cell]) -> Result<(), VizError> {
    let mut seen = HashSet::with_capacity(snapshot.len());
    for cell in snapshot {
        if !seen.insert(cell.id) {
            tracing::warn!(id = cell.id, "rejecting sequence snapshot with duplicate id");
            return Err(VizError::CorruptSnapshot(format!(
                "duplicate element id {}",
                cell.id
            )));
        }
    }
    Ok(())
}

/// Deletion on an empty sequence is reported as such, not as a bad index.
#[inline]
pub(crate) fn check_delete_index(index: usize, len: usize) -> Result<(), VizError> {
    if len == 0 {
        return Err(VizError::EmptyCollection);
    }
    check_element_index(index, len)
}

#[inline]
pub(crate) fn check_insert_index(index: usize, len: usize) -> Result<(), VizError> {
    if index > len {
        return Err(VizError::IndexOutOfRange { index, len });
    }
    Ok(())
}

#[inline]
pub(crate) fn check_element_index(index: usize, len: usize) -> Result<(), VizError> {
    if index >= len {
        return Err(VizError::IndexOutOfRange { index, len });
    }
    Ok(())
}
