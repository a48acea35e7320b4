//! Snapshot pass orchestration.

mod report;

pub use report::PassReport;

use std::collections::HashSet;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use glimpse_config::{Config, HoverConfig, SnapshotConfig};
use glimpse_protocols::{DriverError, PageDriver, Viewport};

use crate::dom::StableElementId;
use crate::error::SnapshotError;
use crate::hover::{BaseView, CandidateSelector, HoverDelta, HoverProber};
use crate::merge::SnapshotMerger;
use crate::sampler::GeometrySampler;
use crate::tree::{ElementNode, TreeBuilder};
use crate::visibility::VisibilityClassifier;

/// A finished snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub root: ElementNode,
    pub viewport: Viewport,
    /// Content was left out to meet the budget or the deadline.
    pub truncated: bool,
}

/// Everything one pass produces.
#[derive(Debug)]
pub struct SnapshotOutcome {
    pub snapshot: Snapshot,
    /// Canonical JSON of `snapshot`.
    pub payload: String,
    pub report: PassReport,
}

/// Runs snapshot passes against a [`PageDriver`].
///
/// A pass samples the page, classifies visibility, builds the base tree,
/// probes hover candidates one by one, merges what they reveal and
/// serializes under the payload budget. The pass uses the driver
/// exclusively and leaves the pointer moved away.
#[derive(Debug, Clone, Default)]
pub struct SnapshotEngine {
    snapshot: SnapshotConfig,
    hover: HoverConfig,
}

impl SnapshotEngine {
    pub fn new(snapshot: SnapshotConfig, hover: HoverConfig) -> Self {
        Self { snapshot, hover }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.snapshot.clone(), config.hover.clone())
    }

    pub fn snapshot_config(&self) -> &SnapshotConfig {
        &self.snapshot
    }

    pub fn hover_config(&self) -> &HoverConfig {
        &self.hover
    }

    /// Run one pass.
    pub async fn run<D: PageDriver + ?Sized>(&self, driver: &D) -> Result<SnapshotOutcome, SnapshotError> {
        let started = Instant::now();
        let deadline = started + self.snapshot.pass_deadline();
        let mut report = PassReport::default();

        let deadline_exceeded = || SnapshotError::PassDeadlineExceeded(self.snapshot.pass_deadline_ms);

        let viewport = tokio::time::timeout_at(deadline, driver.viewport())
            .await
            .map_err(|_| deadline_exceeded())?
            .map_err(SnapshotError::Driver)?;
        debug!(
            "Viewport at ({}, {}) size {}x{}",
            viewport.x, viewport.y, viewport.width, viewport.height
        );

        let base = GeometrySampler::new(self.snapshot.sample_batch_size)
            .sample(driver, Some(deadline))
            .await
            .map_err(|e| match e {
                SnapshotError::Driver(DriverError::Timeout(_)) if Instant::now() >= deadline => {
                    deadline_exceeded()
                }
                other => other,
            })?;
        let classifier = VisibilityClassifier::new(self.snapshot.occlusion_strict_mode);
        let classification = classifier.classify(&base, &viewport);

        report.elements_sampled = base.sampled();
        report.stale_elements = base.stale;
        report.failed_elements = base.failed;
        report.visible_elements = classification.visible_count();
        report.occluded_elements = classification.occluded_count();
        if self.snapshot.occlusion_strict_mode {
            report.occluded_excluded = report.occluded_elements;
        }
        info!(
            "Sampled {} elements, {} visible",
            report.elements_sampled, report.visible_elements
        );

        let base_tree = TreeBuilder::new(&self.snapshot)
            .build(&base.index, &classification.visible)
            .ok_or_else(|| {
                SnapshotError::Driver(DriverError::InvalidResponse(
                    "document has no elements".to_string(),
                ))
            })?;

        let mut truncated = false;
        let deltas: Vec<HoverDelta> = if base.incomplete {
            warn!("Pass deadline reached during base sampling, skipping hover probes");
            report.deadline_hit = true;
            truncated = true;
            Vec::new()
        } else {
            let selection = CandidateSelector::new(&self.hover, self.snapshot.max_hover_candidates)
                .select(&base, &classification);
            report.hover_candidates = selection.candidates.len();
            report.candidates_over_limit = selection.over_limit;
            if selection.over_limit > 0 {
                debug!(
                    "{} hover candidates over the limit of {}",
                    selection.over_limit, self.snapshot.max_hover_candidates
                );
            }

            let visible_ids = classification.visible_ids(&base);
            let tree_ids: HashSet<StableElementId> =
                base_tree.iter().map(|n| n.id.clone()).collect();
            let view = BaseView {
                viewport,
                visible_ids: &visible_ids,
                tree_ids: &tree_ids,
            };

            let run = HoverProber::new(&self.snapshot)
                .probe_all(driver, &selection.candidates, &view, deadline)
                .await;
            report.record_probes(&run.stats);
            truncated |= run.stats.deadline_hit;
            run.deltas
        };
        report.deltas_merged = deltas.len();

        let merger = SnapshotMerger::new(&self.snapshot);
        let tree = merger.merge(base_tree, deltas);
        let (snapshot, payload, budget) = merger.finish(tree, viewport, truncated)?;

        report.record_budget(&budget);
        report.payload_bytes = payload.len();
        report.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            "Snapshot done in {}ms: {} bytes, {} hover deltas, truncated={}",
            report.elapsed_ms, report.payload_bytes, report.deltas_merged, report.truncated
        );

        Ok(SnapshotOutcome {
            snapshot,
            payload,
            report,
        })
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
