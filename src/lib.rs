//! # Identity-tracked structures for animated visualisation
//!
//! This library holds the small in-memory structures behind a
//! data-structure visualiser and reports, for every mutation, enough
//! structural detail for a renderer to animate the transition.
//!
//! ## Components
//!
//! 1. **Sequence models**: array and singly linked list with stable element ids
//! 2. **Stack model**: restricted sequence with push/pop and a popped history
//! 3. **Binary search tree**: ordered keys, every operation reports its descent path
//! 4. **Merge-tree builder**: greedy "merge the two lightest" construction with a
//!    replayable sort trace and merge trace
//! 5. **Tree layout**: subtree-width placement with no overlapping siblings
//!
//! Ids join "before" and "after" snapshots: an id present in both moved, an
//! id only in the new snapshot was created, an id only in the old one was
//! destroyed.
//!
//! ## Usage Example
//!
//! ```
//! use dsviz::{BstModel, LayoutConfig, SubtreeWidthLayout, TreeLayoutStrategy};
//!
//! let mut bst = BstModel::new();
//! bst.create_from_sequence([8, 3, 10, 1, 6]).unwrap();
//! let found = bst.find(6).unwrap();
//! assert_eq!(found.path.len(), 3);
//!
//! let layout = SubtreeWidthLayout::new(LayoutConfig::default())
//!     .layout(&bst.snapshot())
//!     .unwrap();
//! assert_eq!(layout.len(), 5);
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod value;      // Tagged values and id counters
pub mod sequence;   // Array and linked-list models
pub mod stack;      // LIFO model
pub mod tree;       // Shared tree snapshot, validation, traversals
pub mod bst;        // Binary search tree model
pub mod merge_tree; // Greedy merge-tree process builder
pub mod layout;     // Tree layout engines
pub mod persist;    // Save/restore documents

// Re-exports for convenience
pub use value::{parse_sequence, IdCounter, NodeId, Value};
pub use sequence::{ArrayModel, Cell, LinkedListModel, Sequence};
pub use stack::StackModel;
pub use tree::{Direction, NodeRecord, TreeSnapshot};
pub use bst::{BstModel, Insertion, SearchOutcome};
pub use merge_tree::{build_process, BuildProcess, MergeStep, MergeTreeBuilder, SortStep};
pub use layout::{
    InorderConfig, InorderLayout, LayoutConfig, Point, SubtreeWidthLayout, TreeLayout,
    TreeLayoutStrategy,
};
pub use persist::{Document, Persist, PersistError, StructureKind};

use thiserror::Error;

/// Errors reported by model operations
///
/// Every failing operation leaves the model exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VizError {
    /// Positional access outside the valid range
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length of the collection at the time of the call
        len: usize,
    },

    /// Pop/delete on an empty collection
    #[error("collection is empty")]
    EmptyCollection,

    /// A value that must be numeric is not
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A snapshot handed to `load_snapshot` is structurally inconsistent
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}
