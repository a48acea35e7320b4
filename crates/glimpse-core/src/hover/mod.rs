//! Hover-revealed content discovery.

mod candidates;
mod prober;
mod scope;

pub use candidates::{CandidateReason, CandidateSelection, CandidateSelector, HoverCandidate};
pub use prober::{BaseView, HoverDelta, HoverProber, ProbeRun, ProbeStats};

#[cfg(test)]
#[path = "hover_tests.rs"]
mod tests;
