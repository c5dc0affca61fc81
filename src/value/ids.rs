//! Per-model identity counter
//!
//! Ids are never reused within one counter's lifetime except after an
//! explicit `reset`.

use crate::VizError;

/// Element / node identifier
pub type NodeId = u64;

/// Monotonic id source owned by exactly one model
#[derive(Debug, Clone, Default)]
pub struct IdCounter {
    next: NodeId,
}

impl IdCounter {
    /// Counter starting at 0
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Issue the next id
    #[inline]
    pub fn next_id(&mut self) -> NodeId {
        let id = self.next;
        // saturates only after a load resumed within one id of the limit
        self.next = self.next.saturating_add(1);
        id
    }

    /// Id that the next call to `next_id` will return
    #[inline]
    pub fn peek(&self) -> NodeId {
        self.next
    }

    /// Restart at 0
    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Restart just past the largest id in `ids` (0 when empty).
    ///
    /// Fails, leaving the counter as it was, when the largest id is
    /// `NodeId::MAX` and nothing lies past it.
    pub fn resume_after<I>(&mut self, ids: I) -> Result<(), VizError>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let next = match ids.into_iter().max() {
            None => 0,
            Some(max) => max.checked_add(1).ok_or_else(|| {
                VizError::CorruptSnapshot(format!("id {} leaves no room for new ids", max))
            })?,
        };
        self.next = next;
        Ok(())
    }
}
