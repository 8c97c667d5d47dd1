pub mod defaults;
mod detector_config;
mod learner_config;
mod observability_config;
mod pattern_config;
mod reassessment_config;
mod rule_config;
mod signal_config;
mod storage_config;
mod validation_config;

pub use detector_config::DetectorConfig;
pub use learner_config::LearnerConfig;
pub use observability_config::ObservabilityConfig;
pub use pattern_config::PatternConfig;
pub use reassessment_config::ReassessmentConfig;
pub use rule_config::{RuleDefinition, RuleTrigger};
pub use signal_config::SignalConfig;
pub use storage_config::StorageConfig;
pub use validation_config::ValidationConfig;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{AugurError, AugurResult};

/// Top-level configuration aggregating all sub-configs.
///
/// Loaded once at startup; there is no hot reload. Every section defaults
/// independently, so an empty document yields a working configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AugurConfig {
    pub patterns: PatternConfig,
    pub detectors: DetectorConfig,
    pub learner: LearnerConfig,
    pub validation: ValidationConfig,
    pub reassessment: ReassessmentConfig,
    pub signals: SignalConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
    pub rules: Vec<RuleDefinition>,
}

impl AugurConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> AugurResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| AugurError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file, apply `AUGUR_*` environment overrides, validate.
    pub fn from_file(path: &Path) -> AugurResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AugurError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| AugurError::ConfigError(format!("{}: {e}", path.display())))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// `AUGUR_LOG_LEVEL`, `AUGUR_DB_PATH`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("AUGUR_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(path) = std::env::var("AUGUR_DB_PATH") {
            self.storage.db_path = path;
            self.storage.enabled = true;
        }
    }

    /// Reject values that would break store or validator invariants.
    pub fn validate(&self) -> AugurResult<()> {
        let unit = |field: &str, v: f64| -> AugurResult<()> {
            if !(0.0..=1.0).contains(&v) {
                return Err(AugurError::ConfigError(format!(
                    "{field} must be between 0.0 and 1.0, got {v}"
                )));
            }
            Ok(())
        };
        unit("patterns.confidence_floor", self.patterns.confidence_floor)?;
        unit("patterns.confidence_cap", self.patterns.confidence_cap)?;
        unit(
            "validation.min_confidence_threshold",
            self.validation.min_confidence_threshold,
        )?;
        unit("learner.confidence_threshold", self.learner.confidence_threshold)?;
        unit("signals.min_floor", self.signals.min_floor)?;
        unit("signals.max_ceiling", self.signals.max_ceiling)?;

        if !(self.patterns.decay_factor > 0.0 && self.patterns.decay_factor <= 1.0) {
            return Err(AugurError::ConfigError(format!(
                "patterns.decay_factor must be in (0.0, 1.0], got {}",
                self.patterns.decay_factor
            )));
        }
        if self.validation.max_pending_predictions == 0 {
            return Err(AugurError::ConfigError(
                "validation.max_pending_predictions must be at least 1".into(),
            ));
        }
        if self.learner.history_size == 0 {
            return Err(AugurError::ConfigError(
                "learner.history_size must be at least 1".into(),
            ));
        }
        if self.signals.min_floor > self.signals.max_ceiling {
            return Err(AugurError::ConfigError(
                "signals.min_floor exceeds signals.max_ceiling".into(),
            ));
        }
        if self.learner.min_threshold > self.learner.max_threshold {
            return Err(AugurError::ConfigError(
                "learner.min_threshold exceeds learner.max_threshold".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(AugurError::ConfigError(format!(
                    "duplicate rule id '{}'",
                    rule.id
                )));
            }
            if rule.trigger.min_window() == 0 {
                return Err(AugurError::ConfigError(format!(
                    "rule '{}' has an empty trigger",
                    rule.id
                )));
            }
            if let Some(value) = rule
                .trigger
                .values()
                .into_iter()
                .find(|v| *v > crate::constants::OUTCOME_VALUE_MAX)
            {
                return Err(AugurError::ConfigError(format!(
                    "rule '{}' refers to value {value}, outside 0..={}",
                    rule.id,
                    crate::constants::OUTCOME_VALUE_MAX
                )));
            }
        }
        Ok(())
    }
}
