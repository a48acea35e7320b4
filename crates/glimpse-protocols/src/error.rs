//! Driver error types.

use thiserror::Error;

/// Errors reported by a [`PageDriver`](crate::PageDriver) backend.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The element is detached from the document (or otherwise unreachable).
    #[error("Stale element: {0}")]
    StaleElement(String),

    /// The backend did not answer in time.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The page or session is gone.
    #[error("Page unavailable: {0}")]
    Unavailable(String),

    /// Script evaluation inside the page failed.
    #[error("Script error: {0}")]
    Script(String),

    /// The backend answered with something we could not interpret.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Any other backend failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl DriverError {
    /// Whether this error only concerns a single element.
    pub fn is_stale(&self) -> bool {
        matches!(self, DriverError::StaleElement(_))
    }
}

impl From<serde_json::Error> for DriverError {
    fn from(e: serde_json::Error) -> Self {
        DriverError::InvalidResponse(e.to_string())
    }
}
