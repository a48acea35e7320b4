//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_snapshot(config, &mut result);
        Self::validate_hover(config, &mut result);
        Self::validate_browser(config, &mut result);

        Ok(result)
    }

    /// Validate and turn the first error into a [`ConfigError`].
    pub fn ensure_valid(config: &Config) -> Result<ValidationResult, ConfigError> {
        let result = Self::validate(config)?;
        if let Some(first) = result.errors.first() {
            return Err(ConfigError::InvalidValue {
                field: first.path.clone(),
                message: first.message.clone(),
            });
        }
        Ok(result)
    }

    fn validate_snapshot(config: &Config, result: &mut ValidationResult) {
        let snapshot = &config.snapshot;

        if snapshot.max_payload_bytes == 0 {
            result.add_error(ValidationError::new(
                "snapshot.max_payload_bytes",
                "max_payload_bytes must be greater than 0",
            ));
        } else if snapshot.max_payload_bytes < 256 {
            result.add_warning(ValidationWarning::new(
                "snapshot.max_payload_bytes",
                "max_payload_bytes is very small (<256), most pages will fail with an overflow",
            ));
        }

        if let Some(cap) = snapshot.hard_cap_bytes {
            if cap < snapshot.max_payload_bytes {
                result.add_warning(ValidationWarning::new(
                    "snapshot.hard_cap_bytes",
                    "hard_cap_bytes is below max_payload_bytes and will be raised to it",
                ));
            }
        }

        if snapshot.pass_deadline_ms == 0 {
            result.add_error(ValidationError::new(
                "snapshot.pass_deadline_ms",
                "pass_deadline_ms must be greater than 0",
            ));
        }

        if snapshot.hover_probe_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "snapshot.hover_probe_timeout_ms",
                "hover_probe_timeout_ms must be greater than 0",
            ));
        }

        if snapshot.sample_batch_size == 0 {
            result.add_error(ValidationError::new(
                "snapshot.sample_batch_size",
                "sample_batch_size must be greater than 0",
            ));
        }

        if snapshot.settle_poll_ms == 0 {
            result.add_error(ValidationError::new(
                "snapshot.settle_poll_ms",
                "settle_poll_ms must be greater than 0",
            ));
        }

        if snapshot.settle_max_ms >= snapshot.hover_probe_timeout_ms {
            result.add_warning(ValidationWarning::new(
                "snapshot.settle_max_ms",
                "settle_max_ms is not below hover_probe_timeout_ms, slow pages will time out instead of settling",
            ));
        }

        let probe_budget = snapshot
            .hover_probe_timeout_ms
            .saturating_mul(snapshot.max_hover_candidates as u64);
        if probe_budget > snapshot.pass_deadline_ms {
            result.add_warning(ValidationWarning::new(
                "snapshot.max_hover_candidates",
                format!(
                    "{} candidates x {}ms may exceed the {}ms pass deadline",
                    snapshot.max_hover_candidates,
                    snapshot.hover_probe_timeout_ms,
                    snapshot.pass_deadline_ms
                ),
            ));
        }

        if snapshot.attribute_allow_list.is_empty() {
            result.add_warning(ValidationWarning::new(
                "snapshot.attribute_allow_list",
                "attribute_allow_list is empty, output nodes will carry no attributes",
            ));
        }
    }

    fn validate_hover(config: &Config, result: &mut ValidationResult) {
        let hover = &config.hover;

        if hover.min_width < 0.0 || hover.min_height < 0.0 {
            result.add_error(ValidationError::new(
                "hover.min_width",
                "minimum candidate size cannot be negative",
            ));
        }

        for (i, criterion) in hover.criteria.iter().enumerate() {
            if criterion.is_empty() {
                result.add_warning(ValidationWarning::new(
                    format!("hover.criteria[{}]", i),
                    "criterion has no fields and matches every element",
                ));
            }
        }

        if hover.enabled
            && hover.tags.is_empty()
            && hover.roles.is_empty()
            && hover.cursors.is_empty()
            && !hover.popup_attributes
            && hover.criteria.is_empty()
        {
            result.add_warning(ValidationWarning::new(
                "hover",
                "hover probing is enabled but no rule can select a candidate",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let endpoint = &config.browser.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            result.add_error(ValidationError::new(
                "browser.endpoint",
                "endpoint must start with http:// or https://",
            ));
        }

        if config.browser.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
