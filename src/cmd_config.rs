//! `check-config` command handler.

use std::path::Path;

use anyhow::bail;

use glimpse_config::{Config, ConfigValidator};

pub(crate) fn check_config(config: &Config, source: Option<&Path>) -> anyhow::Result<()> {
    match source {
        Some(path) => println!("Config: {}", path.display()),
        None => println!("Config: built-in defaults"),
    }

    let result = ConfigValidator::validate(config)?;
    for warning in &result.warnings {
        println!("  warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("  error: {}: {}", error.path, error.message);
    }

    println!("{}", serde_json::to_string_pretty(config)?);

    if !result.is_valid() {
        bail!("configuration has {} error(s)", result.errors.len());
    }
    println!("OK");
    Ok(())
}
