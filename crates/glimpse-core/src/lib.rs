//! # Glimpse Core
//!
//! Builds a compact, viewport-scoped snapshot of a rendered page and
//! discovers content that only appears while the pointer hovers an element.
//!
//! ## Pipeline
//!
//! - [`GeometrySampler`] reads the DOM and per-element geometry from a
//!   [`PageDriver`](glimpse_protocols::PageDriver)
//! - [`VisibilityClassifier`] decides what is on screen
//! - [`TreeBuilder`] keeps visible elements and their ancestors
//! - [`HoverProber`] hovers candidates one at a time and records what each
//!   reveals
//! - [`SnapshotMerger`] folds the revealed subtrees into the base tree and
//!   enforces the payload budget
//! - [`SnapshotSerializer`] produces the wire JSON
//!
//! [`SnapshotEngine`] runs the whole pass.

pub mod dom;
pub mod engine;
pub mod error;
pub mod hover;
pub mod merge;
pub mod sampler;
pub mod serialize;
pub mod tree;
pub mod visibility;

pub use dom::{DomIndex, StableElementId};
pub use engine::{PassReport, Snapshot, SnapshotEngine, SnapshotOutcome};
pub use error::SnapshotError;
pub use hover::{CandidateSelector, HoverCandidate, HoverDelta, HoverProber};
pub use merge::{BudgetOutcome, MergeTree, SnapshotMerger};
pub use sampler::{GeometrySampler, Sample};
pub use serialize::SnapshotSerializer;
pub use tree::{ElementNode, TreeBuilder, VisibilitySource};
pub use visibility::{Classification, VisibilityClassifier};

#[cfg(test)]
mod test_support;
