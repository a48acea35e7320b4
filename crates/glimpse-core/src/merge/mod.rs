//! Folding hover deltas into the base tree under a payload budget.

mod arena;
mod budget;

pub use arena::MergeTree;
pub use budget::BudgetOutcome;

use tracing::{debug, info};

use glimpse_config::SnapshotConfig;
use glimpse_protocols::Viewport;

use crate::engine::Snapshot;
use crate::error::SnapshotError;
use crate::hover::HoverDelta;
use crate::serialize::SnapshotSerializer;
use crate::tree::ElementNode;

/// Combines the base tree and hover deltas into the final snapshot.
pub struct SnapshotMerger<'a> {
    config: &'a SnapshotConfig,
    serializer: SnapshotSerializer,
}

impl<'a> SnapshotMerger<'a> {
    pub fn new(config: &'a SnapshotConfig) -> Self {
        Self {
            config,
            serializer: SnapshotSerializer::new(config.emit_stable_ids),
        }
    }

    pub fn serializer(&self) -> &SnapshotSerializer {
        &self.serializer
    }

    /// Attach every delta, in probe order. Nodes already present keep their
    /// first-seen source.
    pub fn merge(&self, base: ElementNode, deltas: Vec<HoverDelta>) -> MergeTree {
        let mut tree = MergeTree::from_tree(base);
        for (k, delta) in deltas.into_iter().enumerate() {
            let trigger = delta.trigger.clone();
            let added = tree.insert_delta(k, delta);
            debug!("Merged {} new nodes revealed by {}", added, trigger);
        }
        tree
    }

    /// Apply the budget and serialize.
    ///
    /// Fails with [`SnapshotError::SerializationOverflow`] when even the
    /// truncated snapshot is above the hard cap.
    pub fn finish(
        &self,
        mut tree: MergeTree,
        viewport: Viewport,
        truncated: bool,
    ) -> Result<(Snapshot, String, BudgetOutcome), SnapshotError> {
        let budget = self.config.max_payload_bytes;
        let cap = self.config.hard_cap();

        let outcome = tree.enforce_budget(&self.serializer, &viewport, truncated, budget)?;
        if outcome.hover_subtrees_dropped > 0 || outcome.texts_cleared > 0 {
            info!(
                "Truncated snapshot to {} bytes: dropped {} hover subtrees, cleared {} texts",
                outcome.size, outcome.hover_subtrees_dropped, outcome.texts_cleared
            );
        }
        if outcome.size > cap {
            return Err(SnapshotError::SerializationOverflow {
                size: outcome.size,
                cap,
            });
        }

        let snapshot = Snapshot {
            root: tree.into_tree(),
            viewport,
            truncated: outcome.truncated,
        };
        let payload = self.serializer.to_json(&snapshot)?;
        if payload.len() != outcome.size {
            debug!(
                "Payload is {} bytes, accounted {} bytes",
                payload.len(),
                outcome.size
            );
        }
        if payload.len() > cap {
            return Err(SnapshotError::SerializationOverflow {
                size: payload.len(),
                cap,
            });
        }

        Ok((snapshot, payload, outcome))
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
