//! In-order column layout
//!
//! Node `k` in in-order sequence gets column `k`; the row is its depth.
//! The columns are then centred on x = 0. Simple and compact, and
//! never overlaps because every node owns a column.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Point, TreeLayout, TreeLayoutStrategy};
use crate::tree::traversal::in_order_with_depth;
use crate::tree::TreeSnapshot;
use crate::VizError;

/// Spacing used by [`InorderLayout`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InorderConfig {
    /// Distance between adjacent columns
    pub column_gap: f64,
    /// Distance between rows
    pub row_gap: f64,
    /// `y` of the root row
    pub row_offset: f64,
}

impl Default for InorderConfig {
    fn default() -> Self {
        Self {
            column_gap: 120.0,
            row_gap: 110.0,
            row_offset: -200.0,
        }
    }
}

/// Column-per-node layout
#[derive(Debug, Clone, Default)]
pub struct InorderLayout {
    config: InorderConfig,
}

impl InorderLayout {
    /// Layout with the given spacing
    pub fn new(config: InorderConfig) -> Self {
        Self { config }
    }
}

impl TreeLayoutStrategy for InorderLayout {
    fn name(&self) -> &'static str {
        "inorder"
    }

    fn layout(&self, snapshot: &TreeSnapshot) -> Result<TreeLayout, VizError> {
        let cfg = &self.config;
        if ![cfg.column_gap, cfg.row_gap, cfg.row_offset]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(VizError::InvalidValue(
                "in-order layout spacing must be finite".to_string(),
            ));
        }
        snapshot.validate()?;

        let ordered = in_order_with_depth(snapshot);
        let total = ordered.len().max(1);
        let shift = (total - 1) as f64 * cfg.column_gap / 2.0;

        let positions: BTreeMap<_, _> = ordered
            .into_iter()
            .enumerate()
            .map(|(column, (id, depth))| {
                let x = column as f64 * cfg.column_gap - shift;
                let y = depth as f64 * cfg.row_gap + cfg.row_offset;
                (id, Point::new(x, y))
            })
            .collect();

        debug!(strategy = self.name(), nodes = positions.len(), "tree laid out");
        Ok(TreeLayout::from_positions(positions))
    }
}
