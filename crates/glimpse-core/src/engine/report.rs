//! Pass statistics.

use serde::Serialize;

use crate::hover::ProbeStats;
use crate::merge::BudgetOutcome;

/// Counters describing one snapshot pass.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub elements_sampled: usize,
    pub stale_elements: usize,
    /// Elements whose geometry could not be read for a reason other than detachment.
    pub failed_elements: usize,
    pub visible_elements: usize,
    pub occluded_elements: usize,
    /// Occluded elements left out because strict mode is on.
    pub occluded_excluded: usize,
    pub hover_candidates: usize,
    /// Matching candidates past `maxHoverCandidates`.
    pub candidates_over_limit: usize,
    pub probes_run: usize,
    pub probes_timed_out: usize,
    pub probes_failed: usize,
    pub probes_empty: usize,
    pub lingering_elements: usize,
    pub deltas_merged: usize,
    pub hover_subtrees_dropped: usize,
    pub texts_cleared: usize,
    pub deadline_hit: bool,
    pub truncated: bool,
    pub payload_bytes: usize,
    pub elapsed_ms: u64,
}

impl PassReport {
    pub(crate) fn record_probes(&mut self, stats: &ProbeStats) {
        self.probes_run = stats.run;
        self.probes_timed_out = stats.timed_out;
        self.probes_failed = stats.failed;
        self.probes_empty = stats.empty;
        self.lingering_elements = stats.lingering;
        self.deadline_hit |= stats.deadline_hit;
    }

    pub(crate) fn record_budget(&mut self, outcome: &BudgetOutcome) {
        self.hover_subtrees_dropped = outcome.hover_subtrees_dropped;
        self.texts_cleared = outcome.texts_cleared;
        self.truncated = outcome.truncated;
    }

    /// Probes that did not finish.
    pub fn probes_skipped(&self) -> usize {
        self.probes_timed_out + self.probes_failed
    }
}
