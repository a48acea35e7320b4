//! Snapshot error types.

use thiserror::Error;

use glimpse_protocols::DriverError;

/// Errors raised during a snapshot pass.
///
/// Only [`Driver`](SnapshotError::Driver) failures while reading the viewport
/// or enumerating the base document, [`SerializationOverflow`](SnapshotError::SerializationOverflow)
/// and [`Serialization`](SnapshotError::Serialization) end a pass, plus
/// [`PassDeadlineExceeded`](SnapshotError::PassDeadlineExceeded) when the
/// deadline passes before the base document was enumerated. The rest are
/// absorbed where they happen and show up in the pass report.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Stale element: {0}")]
    StaleElement(String),

    #[error("Hover probe on {trigger} timed out after {timeout_ms}ms")]
    ProbeTimeout { trigger: String, timeout_ms: u64 },

    #[error("Pass deadline of {0}ms exceeded")]
    PassDeadlineExceeded(u64),

    #[error("Snapshot is {size} bytes after truncation, above the hard cap of {cap} bytes")]
    SerializationOverflow { size: usize, cap: usize },

    #[error("Driver error: {0}")]
    Driver(DriverError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SnapshotError {
    /// Whether the pass can skip the failing unit and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SnapshotError::StaleElement(_)
                | SnapshotError::ProbeTimeout { .. }
                | SnapshotError::PassDeadlineExceeded(_)
        )
    }
}

impl From<DriverError> for SnapshotError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::StaleElement(what) => SnapshotError::StaleElement(what),
            other => SnapshotError::Driver(other),
        }
    }
}
