//! Fixture loading errors.

use thiserror::Error;

/// Errors raised while loading or checking a page model.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid page model: {0}")]
    Invalid(String),
}
