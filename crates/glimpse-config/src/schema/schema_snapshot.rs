//! Snapshot pass configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Attributes kept on output nodes unless configured otherwise.
///
/// A trailing `*` matches any suffix (`aria-*`).
pub const DEFAULT_ATTRIBUTE_ALLOW_LIST: &[&str] = &[
    "role", "id", "class", "href", "alt", "aria-*", "name", "type", "value",
];

/// Budgets and switches for one snapshot pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Size budget for the serialized payload.
    #[serde(default = "default_max_payload_bytes", alias = "maxPayloadBytes")]
    pub max_payload_bytes: usize,

    /// Size above which the pass fails instead of returning a truncated payload.
    /// Defaults to `max_payload_bytes`.
    #[serde(default, alias = "hardCapBytes", skip_serializing_if = "Option::is_none")]
    pub hard_cap_bytes: Option<usize>,

    #[serde(default = "default_hover_probe_timeout_ms", alias = "hoverProbeTimeoutMs")]
    pub hover_probe_timeout_ms: u64,

    #[serde(default = "default_max_hover_candidates", alias = "maxHoverCandidates")]
    pub max_hover_candidates: usize,

    #[serde(default = "default_pass_deadline_ms", alias = "passDeadlineMs")]
    pub pass_deadline_ms: u64,

    /// Exclude z-order occluded elements instead of only flagging them.
    #[serde(default, alias = "occlusionStrictMode")]
    pub occlusion_strict_mode: bool,

    /// Elements per geometry read round-trip.
    #[serde(default = "default_sample_batch_size", alias = "sampleBatchSize")]
    pub sample_batch_size: usize,

    /// Interval between re-samples while waiting for layout to settle after a hover.
    #[serde(default = "default_settle_poll_ms", alias = "settlePollMs")]
    pub settle_poll_ms: u64,

    /// Longest settle wait before the last sample is taken as final.
    #[serde(default = "default_settle_max_ms", alias = "settleMaxMs")]
    pub settle_max_ms: u64,

    /// Bound on restoring the pointer after a probe.
    #[serde(default = "default_restore_timeout_ms", alias = "restoreTimeoutMs")]
    pub restore_timeout_ms: u64,

    /// Add a `stableId` key to every serialized node.
    #[serde(default, alias = "emitStableIds")]
    pub emit_stable_ids: bool,

    /// Drop visible leaves that carry neither text nor kept attributes.
    #[serde(default, alias = "pruneEmptyLeaves")]
    pub prune_empty_leaves: bool,

    #[serde(default = "default_attribute_allow_list", alias = "attributeAllowList")]
    pub attribute_allow_list: Vec<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: default_max_payload_bytes(),
            hard_cap_bytes: None,
            hover_probe_timeout_ms: default_hover_probe_timeout_ms(),
            max_hover_candidates: default_max_hover_candidates(),
            pass_deadline_ms: default_pass_deadline_ms(),
            occlusion_strict_mode: false,
            sample_batch_size: default_sample_batch_size(),
            settle_poll_ms: default_settle_poll_ms(),
            settle_max_ms: default_settle_max_ms(),
            restore_timeout_ms: default_restore_timeout_ms(),
            emit_stable_ids: false,
            prune_empty_leaves: false,
            attribute_allow_list: default_attribute_allow_list(),
        }
    }
}

impl SnapshotConfig {
    /// Effective hard cap, never below the budget.
    pub fn hard_cap(&self) -> usize {
        self.hard_cap_bytes
            .unwrap_or(self.max_payload_bytes)
            .max(self.max_payload_bytes)
    }

    pub fn hover_probe_timeout(&self) -> Duration {
        Duration::from_millis(self.hover_probe_timeout_ms)
    }

    pub fn pass_deadline(&self) -> Duration {
        Duration::from_millis(self.pass_deadline_ms)
    }

    pub fn settle_poll(&self) -> Duration {
        Duration::from_millis(self.settle_poll_ms)
    }

    pub fn settle_max(&self) -> Duration {
        Duration::from_millis(self.settle_max_ms)
    }

    pub fn restore_timeout(&self) -> Duration {
        Duration::from_millis(self.restore_timeout_ms)
    }

    /// Whether an attribute name passes the allow-list.
    pub fn allows_attribute(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.attribute_allow_list.iter().any(|pattern| {
            match pattern.strip_suffix('*') {
                Some(prefix) => name.starts_with(&prefix.to_ascii_lowercase()),
                None => pattern.eq_ignore_ascii_case(&name),
            }
        })
    }
}

fn default_max_payload_bytes() -> usize {
    64 * 1024
}

fn default_hover_probe_timeout_ms() -> u64 {
    2_000
}

fn default_max_hover_candidates() -> usize {
    25
}

fn default_pass_deadline_ms() -> u64 {
    30_000
}

fn default_sample_batch_size() -> usize {
    256
}

fn default_settle_poll_ms() -> u64 {
    100
}

fn default_settle_max_ms() -> u64 {
    1_000
}

fn default_restore_timeout_ms() -> u64 {
    1_000
}

fn default_attribute_allow_list() -> Vec<String> {
    DEFAULT_ATTRIBUTE_ALLOW_LIST
        .iter()
        .map(|s| s.to_string())
        .collect()
}
