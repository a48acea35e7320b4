//! Configuration schema definitions.
//!
//! Field names are snake_case in TOML; the camelCase spellings used by
//! callers that pass options as JSON (`maxPayloadBytes`, ...) are accepted
//! as aliases.

use serde::{Deserialize, Serialize};

mod schema_hover;
mod schema_infra;
mod schema_snapshot;

pub use schema_hover::*;
pub use schema_infra::*;
pub use schema_snapshot::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub hover: HoverConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
