//! Tree layout
//!
//! Turns a [`TreeSnapshot`] into final 2-D positions. Layouts are pure
//! and not incremental: re-run after every structural change.
//!
//! Two strategies:
//! - [`SubtreeWidthLayout`]: reserves a width per subtree so sibling
//!   subtrees never overlap (BST views)
//! - [`InorderLayout`]: one column per node in in-order sequence
//!   (merge-tree views)
//!
//! Coordinates: `x` is the node's horizontal centre, `y` the top of its
//! row. Depth alone decides `y`.

mod inorder;
mod subtree;

pub use inorder::{InorderConfig, InorderLayout};
pub use subtree::SubtreeWidthLayout;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::TreeSnapshot;
use crate::value::NodeId;
use crate::VizError;

/// A placement strategy
pub trait TreeLayoutStrategy {
    /// Short name for logs and CLI output
    fn name(&self) -> &'static str;

    /// Place every node reachable from the root.
    ///
    /// Fails with [`VizError::CorruptSnapshot`] if the snapshot is not a
    /// single well-formed tree.
    fn layout(&self, snapshot: &TreeSnapshot) -> Result<TreeLayout, VizError>;
}

/// Position of one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal centre
    pub x: f64,
    /// Top of the node's row
    pub y: f64,
}

impl Point {
    /// Construct a point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Top-left corner of a node box of the given diameter
    pub fn top_left(&self, diameter: f64) -> Point {
        Point::new(self.x - diameter / 2.0, self.y)
    }
}

/// Node id → position
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreeLayout {
    positions: BTreeMap<NodeId, Point>,
}

impl TreeLayout {
    pub(crate) fn from_positions(positions: BTreeMap<NodeId, Point>) -> Self {
        Self { positions }
    }

    /// Position of `id`
    pub fn get(&self, id: NodeId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Number of placed nodes
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing was placed
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions in id order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Point)> + '_ {
        self.positions.iter().map(|(&id, &p)| (id, p))
    }

    /// `(min_x, max_x, min_y, max_y)` over node centres
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut points = self.positions.values();
        let first = points.next()?;
        Some(points.fold(
            (first.x, first.x, first.y, first.y),
            |(min_x, max_x, min_y, max_y), p| {
                (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
            },
        ))
    }

    /// Shift every `y` so the smallest sits at `anchor_y`.
    pub(crate) fn anchor_rows(&mut self, anchor_y: f64) {
        let Some(min_y) = self.positions.values().map(|p| p.y).reduce(f64::min) else {
            return;
        };
        for p in self.positions.values_mut() {
            p.y = p.y - min_y + anchor_y;
        }
    }
}

/// Spacing used by [`SubtreeWidthLayout`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Minimum horizontal gap between sibling subtrees
    pub horizontal_gap: f64,

    /// Distance between consecutive rows
    pub vertical_gap: f64,

    /// Width of one node box
    pub node_diameter: f64,

    /// Horizontal offset of a lone child from its parent
    pub min_horizontal_offset: f64,

    /// `y` of the shallowest row after normalisation
    pub anchor_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_gap: 90.0,
            vertical_gap: 130.0,
            node_diameter: 70.0,
            min_horizontal_offset: 60.0,
            anchor_y: -40.0,
        }
    }
}

impl LayoutConfig {
    /// Set sibling gap
    pub fn with_horizontal_gap(mut self, gap: f64) -> Self {
        self.horizontal_gap = gap;
        self
    }

    /// Set row distance
    pub fn with_vertical_gap(mut self, gap: f64) -> Self {
        self.vertical_gap = gap;
        self
    }

    /// Set node box width
    pub fn with_node_diameter(mut self, diameter: f64) -> Self {
        self.node_diameter = diameter;
        self
    }

    /// Set lone-child offset
    pub fn with_min_horizontal_offset(mut self, offset: f64) -> Self {
        self.min_horizontal_offset = offset;
        self
    }

    /// Set the row anchor
    pub fn with_anchor_y(mut self, anchor_y: f64) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Sizes must be finite and non-negative, the node box positive.
    pub fn validate(&self) -> Result<(), VizError> {
        let sizes = [
            ("horizontal_gap", self.horizontal_gap),
            ("vertical_gap", self.vertical_gap),
            ("min_horizontal_offset", self.min_horizontal_offset),
        ];
        for (name, v) in sizes {
            if !v.is_finite() || v < 0.0 {
                return Err(VizError::InvalidValue(format!(
                    "{} must be finite and >= 0, got {}",
                    name, v
                )));
            }
        }
        if !self.node_diameter.is_finite() || self.node_diameter <= 0.0 {
            return Err(VizError::InvalidValue(format!(
                "node_diameter must be finite and > 0, got {}",
                self.node_diameter
            )));
        }
        if !self.anchor_y.is_finite() {
            return Err(VizError::InvalidValue("anchor_y must be finite".to_string()));
        }
        Ok(())
    }
}
