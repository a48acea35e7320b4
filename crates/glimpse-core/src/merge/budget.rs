//! Payload budget enforcement.

use serde::Serialize;
use tracing::debug;

use glimpse_protocols::Viewport;

use crate::error::SnapshotError;
use crate::serialize::{SnapshotSerializer, NULL_LEN};

use super::arena::MergeTree;

/// What truncation did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BudgetOutcome {
    pub truncated: bool,
    /// Serialized size after truncation.
    pub size: usize,
    pub hover_subtrees_dropped: usize,
    pub texts_cleared: usize,
}

impl MergeTree {
    /// Shrink the tree until its serialized size fits `budget`.
    ///
    /// Hover subtrees go first, latest delta first. Then text is cleared on
    /// leaves, starting from the end of the document. Sizes are tracked
    /// exactly, so the result never needs a trial serialization. The outcome
    /// may still be over budget when nothing is left to remove.
    pub fn enforce_budget(
        &mut self,
        serializer: &SnapshotSerializer,
        viewport: &Viewport,
        truncated: bool,
        budget: usize,
    ) -> Result<BudgetOutcome, SnapshotError> {
        self.compute_sizes(serializer)?;

        let mut outcome = BudgetOutcome {
            truncated,
            ..Default::default()
        };
        let envelope = serializer.envelope_len(viewport, truncated)?;
        if envelope + self.slots[0].size <= budget {
            outcome.size = envelope + self.slots[0].size;
            return Ok(outcome);
        }

        outcome.truncated = true;
        let envelope = serializer.envelope_len(viewport, true)?;
        let total = |tree: &MergeTree| envelope + tree.slots[0].size;

        let hover_roots = self.hover_roots.clone();
        for root in hover_roots.iter().rev() {
            if total(self) <= budget {
                break;
            }
            if self.is_attached(root.slot) {
                debug!(
                    "Dropping {} revealed by hover probe {}",
                    self.slots[root.slot].node.id, root.delta
                );
                self.detach(root.slot);
                outcome.hover_subtrees_dropped += 1;
            }
        }

        if total(self) > budget {
            for slot in self.text_leaves().into_iter().rev() {
                if total(self) <= budget {
                    break;
                }
                if self.clear_text(slot)? {
                    outcome.texts_cleared += 1;
                }
            }
        }

        outcome.size = total(self);
        Ok(outcome)
    }

    /// Size of every subtree, children before parents.
    fn compute_sizes(&mut self, serializer: &SnapshotSerializer) -> Result<(), SnapshotError> {
        for i in (0..self.slots.len()).rev() {
            let shell = serializer.shell_len(&self.slots[i].node)?;
            let children = &self.slots[i].children;
            let nested: usize = children.iter().map(|c| self.slots[*c].size).sum();
            let commas = children.len().saturating_sub(1);
            self.slots[i].size = shell + nested + commas;
        }
        Ok(())
    }

    /// Remove a subtree from its parent.
    fn detach(&mut self, slot: usize) {
        let Some(parent) = self.slots[slot].parent else {
            return;
        };
        let comma = usize::from(self.slots[parent].children.len() > 1);
        let removed = self.slots[slot].size + comma;

        self.slots[parent].children.retain(|c| *c != slot);
        self.slots[slot].live = false;
        self.shrink_from(parent, removed);
    }

    /// Set a node's text to null. Returns false when that would not save bytes.
    fn clear_text(&mut self, slot: usize) -> Result<bool, SnapshotError> {
        let len = SnapshotSerializer::text_len(self.slots[slot].node.text_content.as_deref())?;
        if len <= NULL_LEN {
            return Ok(false);
        }
        self.slots[slot].node.text_content = None;
        self.shrink_from(slot, len - NULL_LEN);
        Ok(true)
    }

    /// Subtract `bytes` from `slot` and every ancestor.
    fn shrink_from(&mut self, slot: usize, bytes: usize) {
        let mut current = Some(slot);
        while let Some(s) = current {
            self.slots[s].size -= bytes;
            current = self.slots[s].parent;
        }
    }

    /// Live leaves with text, in document order.
    fn text_leaves(&self) -> Vec<usize> {
        self.live_slots()
            .into_iter()
            .filter(|s| self.slots[*s].children.is_empty() && self.slots[*s].node.text_content.is_some())
            .collect()
    }
}
