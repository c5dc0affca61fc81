//! Document framing

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::PersistError;
use crate::sequence::Cell;
use crate::tree::TreeSnapshot;

/// Schema marker every document carries
pub const SCHEMA: &str = "dsviz.structure";

/// Current document version
pub const VERSION: u32 = 1;

/// Structure a document holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// `ArrayModel`
    Array,
    /// `LinkedListModel`
    LinkedList,
    /// `StackModel`
    Stack,
    /// `BstModel`
    Bst,
    /// Merge-tree build process
    MergeTree,
}

impl StructureKind {
    /// Every kind, in declaration order
    pub const ALL: [StructureKind; 5] = [
        StructureKind::Array,
        StructureKind::LinkedList,
        StructureKind::Stack,
        StructureKind::Bst,
        StructureKind::MergeTree,
    ];

    /// Name written to the `structure` field
    pub fn as_str(self) -> &'static str {
        match self {
            StructureKind::Array => "array",
            StructureKind::LinkedList => "linked_list",
            StructureKind::Stack => "stack",
            StructureKind::Bst => "bst",
            StructureKind::MergeTree => "merge_tree",
        }
    }

    /// Parse a `structure` field
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Whether `nodes` holds a tree snapshot rather than a cell list
    pub fn is_tree(self) -> bool {
        matches!(self, StructureKind::Bst | StructureKind::MergeTree)
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted snapshot with framing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Fixed marker, [`SCHEMA`]
    pub schema: String,

    /// Format version
    pub version: u32,

    /// Structure name (see [`StructureKind::as_str`])
    pub structure: String,

    /// The snapshot itself
    pub nodes: serde_json::Value,

    /// Structure-specific extras (`popped` for stacks, trace parts for
    /// merge trees)
    #[serde(flatten)]
    pub extras: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    /// Frame a snapshot
    pub fn new<T: Serialize + ?Sized>(kind: StructureKind, nodes: &T) -> Result<Self, PersistError> {
        Ok(Self {
            schema: SCHEMA.to_string(),
            version: VERSION,
            structure: kind.as_str().to_string(),
            nodes: serde_json::to_value(nodes)?,
            extras: serde_json::Map::new(),
        })
    }

    /// Attach an extra field
    pub fn with_extra<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Result<Self, PersistError> {
        self.extras.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Parse JSON text. Only framing is checked here.
    pub fn from_json(text: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Pretty JSON text
    pub fn to_json_pretty(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Recognise schema, structure and version.
    pub fn kind(&self) -> Result<StructureKind, PersistError> {
        let kind = match StructureKind::from_name(&self.structure) {
            Some(kind) if self.schema == SCHEMA => kind,
            _ => {
                return Err(PersistError::UnrecognizedDocument {
                    schema: self.schema.clone(),
                    structure: self.structure.clone(),
                })
            }
        };
        if self.version == 0 || self.version > VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: self.version,
                supported: VERSION,
            });
        }
        Ok(kind)
    }

    /// Recognise the document and require a specific structure.
    pub fn expect_kind(&self, expected: StructureKind) -> Result<(), PersistError> {
        let found = self.kind()?;
        if found != expected {
            return Err(PersistError::WrongStructure { expected, found });
        }
        Ok(())
    }

    /// `nodes` as an ordered cell list
    pub fn sequence_nodes(&self) -> Result<Vec<Cell>, PersistError> {
        Vec::<Cell>::deserialize(&self.nodes).map_err(|e| PersistError::MalformedNodes(e.to_string()))
    }

    /// `nodes` as a tree snapshot
    pub fn tree_nodes(&self) -> Result<TreeSnapshot, PersistError> {
        TreeSnapshot::deserialize(&self.nodes).map_err(|e| PersistError::MalformedNodes(e.to_string()))
    }

    /// Typed extra, `None` when absent
    pub fn extra<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistError> {
        self.extras
            .get(key)
            .map(|value| {
                T::deserialize(value)
                    .map_err(|e| PersistError::MalformedNodes(format!("extra '{}': {}", key, e)))
            })
            .transpose()
    }
}
