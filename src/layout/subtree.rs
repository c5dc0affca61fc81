//! Subtree-width layout
//!
//! Two passes over the tree:
//! 1. Post-order: width each subtree must reserve
//! 2. Pre-order: place children around the parent using those widths
//!
//! Both passes walk with an explicit stack, so tree height is bounded
//! only by memory.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{LayoutConfig, Point, TreeLayout, TreeLayoutStrategy};
use crate::tree::traversal::index_nodes;
use crate::tree::{NodeRecord, TreeSnapshot};
use crate::value::NodeId;
use crate::VizError;

/// Non-overlapping layout driven by subtree widths
#[derive(Debug, Clone, Default)]
pub struct SubtreeWidthLayout {
    config: LayoutConfig,
}

impl SubtreeWidthLayout {
    /// Layout with the given spacing
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Spacing in use
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Width pass only: horizontal space reserved by each subtree.
    pub fn subtree_widths(&self, snapshot: &TreeSnapshot) -> Result<BTreeMap<NodeId, f64>, VizError> {
        self.config.validate()?;
        snapshot.validate()?;
        let nodes = index_nodes(snapshot);
        Ok(self.widths(snapshot.root, &nodes))
    }

    fn widths(
        &self,
        root: Option<NodeId>,
        nodes: &HashMap<NodeId, &NodeRecord>,
    ) -> BTreeMap<NodeId, f64> {
        let mut widths = BTreeMap::new();

        // Parents precede children in `order`, so walking it backwards
        // sees every child before its parent.
        let mut order = Vec::with_capacity(nodes.len());
        let mut stack: Vec<NodeId> = root.into_iter().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = nodes.get(&id) {
                order.push(*node);
                stack.extend(node.children());
            }
        }

        let cfg = &self.config;
        for node in order.into_iter().rev() {
            let left = node.left.and_then(|id| widths.get(&id).copied());
            let right = node.right.and_then(|id| widths.get(&id).copied());
            let width = match (left, right) {
                (None, None) => cfg.node_diameter,
                (Some(lw), Some(rw)) => lw + rw + cfg.horizontal_gap,
                (Some(child), None) | (None, Some(child)) => f64::max(
                    cfg.node_diameter / 2.0 + cfg.min_horizontal_offset,
                    child + cfg.node_diameter / 2.0 + cfg.horizontal_gap / 2.0,
                ),
            };
            widths.insert(node.id, width);
        }

        widths
    }
}

impl TreeLayoutStrategy for SubtreeWidthLayout {
    fn name(&self) -> &'static str {
        "subtree-width"
    }

    fn layout(&self, snapshot: &TreeSnapshot) -> Result<TreeLayout, VizError> {
        self.config.validate()?;
        snapshot.validate()?;
        let Some(root) = snapshot.root else {
            return Ok(TreeLayout::default());
        };

        let nodes = index_nodes(snapshot);
        let widths = self.widths(Some(root), &nodes);
        let cfg = &self.config;
        let half_gap = cfg.horizontal_gap / 2.0;

        let mut positions = BTreeMap::new();
        let mut stack: Vec<(NodeId, f64, usize)> = vec![(root, 0.0, 0)];
        while let Some((id, x, depth)) = stack.pop() {
            let Some(node) = nodes.get(&id) else {
                continue;
            };
            positions.insert(id, Point::new(x, depth as f64 * cfg.vertical_gap));

            let child_depth = depth + 1;
            match (node.left, node.right) {
                (Some(left), Some(right)) => {
                    let lw = widths.get(&left).copied().unwrap_or(0.0);
                    let rw = widths.get(&right).copied().unwrap_or(0.0);
                    stack.push((right, x + half_gap + rw / 2.0, child_depth));
                    stack.push((left, x - half_gap - lw / 2.0, child_depth));
                }
                (Some(left), None) => {
                    stack.push((left, x - cfg.min_horizontal_offset, child_depth));
                }
                (None, Some(right)) => {
                    stack.push((right, x + cfg.min_horizontal_offset, child_depth));
                }
                (None, None) => {}
            }
        }

        let mut layout = TreeLayout::from_positions(positions);
        layout.anchor_rows(cfg.anchor_y);
        debug!(
            strategy = self.name(),
            nodes = layout.len(),
            root_width = widths.get(&root).copied().unwrap_or(0.0),
            "tree laid out"
        );
        Ok(layout)
    }
}
