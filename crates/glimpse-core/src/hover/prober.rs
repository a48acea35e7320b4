//! Sequential hover probing.

use std::collections::HashSet;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use glimpse_config::SnapshotConfig;
use glimpse_protocols::{PageDriver, Viewport};

use crate::dom::StableElementId;
use crate::error::SnapshotError;
use crate::sampler::{GeometrySampler, Sample};
use crate::tree::{ElementNode, TreeBuilder};
use crate::visibility::{Classification, VisibilityClassifier};

use super::candidates::HoverCandidate;
use super::scope::while_hovered;

/// Content that became visible while one trigger was hovered.
#[derive(Debug, Clone)]
pub struct HoverDelta {
    pub trigger: StableElementId,
    /// Maximal new subtrees, in document order.
    pub nodes: Vec<ElementNode>,
}

impl HoverDelta {
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(ElementNode::count).sum()
    }
}

/// What the base pass saw, for comparing hover samples against.
pub struct BaseView<'a> {
    pub viewport: Viewport,
    /// Ids visible without interaction.
    pub visible_ids: &'a HashSet<StableElementId>,
    /// Ids present in the base tree (visible elements and their ancestors).
    pub tree_ids: &'a HashSet<StableElementId>,
}

/// Counters for one probing run.
#[derive(Debug, Clone, Default)]
pub struct ProbeStats {
    pub run: usize,
    pub timed_out: usize,
    pub failed: usize,
    pub empty: usize,
    /// Elements still visible after the pointer moved away.
    pub lingering: usize,
    pub deadline_hit: bool,
}

/// Deltas in probe order plus counters.
#[derive(Debug, Default)]
pub struct ProbeRun {
    pub deltas: Vec<HoverDelta>,
    pub stats: ProbeStats,
}

/// Hovers candidates one at a time and records what each reveals.
///
/// Probes never overlap: each one hovers, waits for the page to settle,
/// diffs the visible set against the base pass and moves the pointer away
/// before the next starts. A failing or slow probe is skipped.
pub struct HoverProber<'a> {
    config: &'a SnapshotConfig,
    sampler: GeometrySampler,
    classifier: VisibilityClassifier,
    builder: TreeBuilder<'a>,
}

impl<'a> HoverProber<'a> {
    pub fn new(config: &'a SnapshotConfig) -> Self {
        Self {
            config,
            sampler: GeometrySampler::new(config.sample_batch_size),
            classifier: VisibilityClassifier::new(config.occlusion_strict_mode),
            builder: TreeBuilder::new(config),
        }
    }

    /// Probe `candidates` in order until done or `deadline` passes.
    pub async fn probe_all<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        candidates: &[HoverCandidate],
        base: &BaseView<'_>,
        deadline: Instant,
    ) -> ProbeRun {
        let mut run = ProbeRun::default();
        let mut lingering = HashSet::new();
        let probe_timeout = self.config.hover_probe_timeout();

        for (i, candidate) in candidates.iter().enumerate() {
            let now = Instant::now();
            if now >= deadline {
                info!(
                    "Pass deadline reached, {} hover candidates left unprobed",
                    candidates.len() - i
                );
                run.stats.deadline_hit = true;
                break;
            }

            let remaining = deadline - now;
            let on_timeout = if remaining < probe_timeout {
                SnapshotError::PassDeadlineExceeded(self.config.pass_deadline_ms)
            } else {
                SnapshotError::ProbeTimeout {
                    trigger: candidate.id.to_string(),
                    timeout_ms: self.config.hover_probe_timeout_ms,
                }
            };

            run.stats.run += 1;
            debug!("Probing {} ({:?})", candidate.id, candidate.reason);
            let outcome = while_hovered(
                driver,
                candidate.handle,
                remaining.min(probe_timeout),
                self.config.restore_timeout(),
                on_timeout,
                || self.observe(driver, candidate, base, &lingering),
            )
            .await;

            let mut revealed_any = false;
            match outcome.result {
                Ok(Some(delta)) => {
                    debug!(
                        "Hovering {} revealed {} elements",
                        delta.trigger,
                        delta.node_count()
                    );
                    revealed_any = true;
                    run.deltas.push(delta);
                }
                Ok(None) => run.stats.empty += 1,
                Err(e @ SnapshotError::ProbeTimeout { .. }) => {
                    warn!("Skipping hover candidate: {}", e);
                    run.stats.timed_out += 1;
                }
                Err(e @ SnapshotError::PassDeadlineExceeded(_)) => {
                    warn!("Stopping hover probes on {}: {}", candidate.id, e);
                    run.stats.deadline_hit = true;
                    break;
                }
                Err(e) => {
                    warn!("Hover probe on {} failed: {}", candidate.id, e);
                    run.stats.failed += 1;
                }
            }

            if revealed_any || !outcome.restored {
                run.stats.lingering += self.check_restored(driver, base, &mut lingering).await;
            }
        }

        run
    }

    /// Work done while the candidate is hovered.
    async fn observe<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        candidate: &HoverCandidate,
        base: &BaseView<'_>,
        lingering: &HashSet<StableElementId>,
    ) -> Result<Option<HoverDelta>, SnapshotError> {
        let (sample, classification) = self.settle(driver, &base.viewport).await?;

        let revealed: Vec<bool> = (0..sample.index.len())
            .map(|pos| {
                let id = sample.index.id(pos);
                classification.is_visible(pos)
                    && !base.visible_ids.contains(id)
                    && !lingering.contains(id)
            })
            .collect();
        if !revealed.iter().any(|r| *r) {
            return Ok(None);
        }

        let nodes = self
            .builder
            .build_revealed(&sample.index, &revealed, base.tree_ids);
        if nodes.is_empty() {
            return Ok(None);
        }
        Ok(Some(HoverDelta {
            trigger: candidate.id.clone(),
            nodes,
        }))
    }

    /// Resample until two consecutive visible sets agree or the settle
    /// window closes.
    async fn settle<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        viewport: &Viewport,
    ) -> Result<(Sample, Classification), SnapshotError> {
        let started = Instant::now();
        let mut previous: Option<HashSet<StableElementId>> = None;

        loop {
            tokio::time::sleep(self.config.settle_poll()).await;
            let sample = self.sampler.sample(driver, None).await?;
            let classification = self.classifier.classify(&sample, viewport);
            let ids = classification.visible_ids(&sample);

            let settled = previous.as_ref() == Some(&ids);
            if settled || started.elapsed() >= self.config.settle_max() {
                if !settled {
                    debug!("Page still changing after {}ms, using last sample", self.config.settle_max_ms);
                }
                return Ok((sample, classification));
            }
            previous = Some(ids);
        }
    }

    /// Sample after moving away and remember anything the hover left behind,
    /// so later probes do not attribute it to their own trigger.
    async fn check_restored<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        base: &BaseView<'_>,
        lingering: &mut HashSet<StableElementId>,
    ) -> usize {
        let sampled =
            tokio::time::timeout(self.config.restore_timeout(), self.sampler.sample(driver, None))
                .await;
        let sample = match sampled {
            Ok(Ok(sample)) => sample,
            Ok(Err(e)) => {
                debug!("Post-hover check failed: {}", e);
                return 0;
            }
            Err(_) => {
                debug!("Post-hover check timed out");
                return 0;
            }
        };

        let classification = self.classifier.classify(&sample, &base.viewport);
        let mut added = 0;
        for id in classification.visible_ids(&sample) {
            if !base.visible_ids.contains(&id) && lingering.insert(id) {
                added += 1;
            }
        }
        if added > 0 {
            warn!("{} elements stayed visible after moving the pointer away", added);
        }
        added
    }
}
