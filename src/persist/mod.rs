//! Save/restore documents
//!
//! A document wraps a snapshot with enough framing to recognise it:
//!
//! ```json
//! { "schema": "dsviz.structure", "version": 1, "structure": "stack",
//!   "nodes": [ {"id": 0, "value": 4} ], "popped": [7] }
//! ```
//!
//! Restoring checks, in order: schema and structure name, version,
//! node shape, then model-level validation. Each stage fails with its
//! own error and the target model is only touched once all pass.

mod document;

pub use document::{Document, StructureKind, SCHEMA, VERSION};

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::bst::BstModel;
use crate::merge_tree::BuildProcess;
use crate::sequence::{ArrayModel, LinkedListModel, Sequence};
use crate::stack::StackModel;
use crate::value::Value;
use crate::VizError;

/// Errors while saving or restoring documents
#[derive(Debug, Error)]
pub enum PersistError {
    /// Schema marker or structure name not recognised
    #[error("unrecognized document: schema '{schema}', structure '{structure}'")]
    UnrecognizedDocument {
        /// Schema marker found
        schema: String,
        /// Structure name found
        structure: String,
    },

    /// Recognised document for a different structure
    #[error("document holds a {found} but a {expected} was expected")]
    WrongStructure {
        /// Structure the caller restores into
        expected: StructureKind,
        /// Structure the document holds
        found: StructureKind,
    },

    /// Document written by a newer format
    #[error("unsupported document version {found} (supported up to {supported})")]
    UnsupportedVersion {
        /// Version found
        found: u32,
        /// Highest version understood
        supported: u32,
    },

    /// `nodes` (or an extra) does not have the expected shape
    #[error("malformed nodes: {0}")]
    MalformedNodes(String),

    /// Nodes parsed but the model rejected them
    #[error(transparent)]
    Model(#[from] VizError),

    /// Document is not valid JSON / lacks framing fields
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the document file failed
    #[error("document I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Models that round-trip through a [`Document`]
pub trait Persist {
    /// Structure name written to documents
    const KIND: StructureKind;

    /// Capture current state.
    fn to_document(&self) -> Result<Document, PersistError>;

    /// Replace current state from `doc`; unchanged on any error.
    fn restore(&mut self, doc: &Document) -> Result<(), PersistError>;

    /// Write the document as pretty JSON.
    fn save_to(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_document()?.to_json_pretty()?)?;
        debug!(path = %path.display(), structure = %Self::KIND, "document saved");
        Ok(())
    }

    /// Read a JSON document and restore from it.
    fn load_from(&mut self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let doc = Document::from_json(&std::fs::read_to_string(path)?)?;
        self.restore(&doc)?;
        debug!(path = %path.display(), structure = %Self::KIND, "document restored");
        Ok(())
    }
}

/// JSON has no NaN or infinity; refuse to write a document that could
/// not be read back.
fn require_finite<'a>(values: impl IntoIterator<Item = &'a Value>) -> Result<(), PersistError> {
    match values.into_iter().find(|value| !value.is_finite()) {
        Some(value) => Err(VizError::InvalidValue(format!("{} cannot be saved", value)).into()),
        None => Ok(()),
    }
}

impl Persist for ArrayModel {
    const KIND: StructureKind = StructureKind::Array;

    fn to_document(&self) -> Result<Document, PersistError> {
        let cells = self.snapshot();
        require_finite(cells.iter().map(|cell| &cell.value))?;
        Document::new(Self::KIND, &cells)
    }

    fn restore(&mut self, doc: &Document) -> Result<(), PersistError> {
        doc.expect_kind(Self::KIND)?;
        let cells = doc.sequence_nodes()?;
        self.load_snapshot(&cells)?;
        Ok(())
    }
}

impl Persist for LinkedListModel {
    const KIND: StructureKind = StructureKind::LinkedList;

    fn to_document(&self) -> Result<Document, PersistError> {
        let cells = self.snapshot();
        require_finite(cells.iter().map(|cell| &cell.value))?;
        Document::new(Self::KIND, &cells)
    }

    fn restore(&mut self, doc: &Document) -> Result<(), PersistError> {
        doc.expect_kind(Self::KIND)?;
        let cells = doc.sequence_nodes()?;
        self.load_snapshot(&cells)?;
        Ok(())
    }
}

impl Persist for StackModel {
    const KIND: StructureKind = StructureKind::Stack;

    fn to_document(&self) -> Result<Document, PersistError> {
        let cells = self.snapshot();
        require_finite(cells.iter().map(|cell| &cell.value).chain(self.popped_history()))?;
        Document::new(Self::KIND, &cells)?.with_extra("popped", self.popped_history())
    }

    fn restore(&mut self, doc: &Document) -> Result<(), PersistError> {
        doc.expect_kind(Self::KIND)?;
        let cells = doc.sequence_nodes()?;
        let popped: Vec<Value> = doc.extra("popped")?.unwrap_or_default();
        self.load_snapshot(&cells)?;
        self.set_popped_history(popped);
        Ok(())
    }
}

impl Persist for BstModel {
    const KIND: StructureKind = StructureKind::Bst;

    fn to_document(&self) -> Result<Document, PersistError> {
        let snapshot = self.snapshot();
        require_finite(snapshot.nodes.iter().map(|node| &node.value))?;
        Document::new(Self::KIND, &snapshot)
    }

    fn restore(&mut self, doc: &Document) -> Result<(), PersistError> {
        doc.expect_kind(Self::KIND)?;
        let snapshot = doc.tree_nodes()?;
        self.load_snapshot(&snapshot)?;
        Ok(())
    }
}

impl Persist for BuildProcess {
    const KIND: StructureKind = StructureKind::MergeTree;

    fn to_document(&self) -> Result<Document, PersistError> {
        require_finite(self.final_tree.nodes.iter().map(|node| &node.value))?;
        Document::new(Self::KIND, &self.final_tree)?
            .with_extra("initial", &self.initial)?
            .with_extra("sorting", &self.sorting)?
            .with_extra("building", &self.building)
    }

    fn restore(&mut self, doc: &Document) -> Result<(), PersistError> {
        doc.expect_kind(Self::KIND)?;
        let final_tree = doc.tree_nodes()?;
        final_tree.validate()?;
        let restored = BuildProcess {
            initial: doc.extra("initial")?.unwrap_or_default(),
            sorting: doc.extra("sorting")?.unwrap_or_default(),
            building: doc.extra("building")?.unwrap_or_default(),
            final_tree,
        };
        *self = restored;
        Ok(())
    }
}
