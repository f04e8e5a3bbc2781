use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Thresholds used by the governance rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// `failure_risk` strictly above this marks a product as high risk.
    pub high_risk_failure_threshold: f64,
    /// `revenue_target` strictly below this is considered low revenue.
    pub low_revenue_threshold: f64,
    /// Minimum readiness score expected of a commercial product.
    pub commercial_min_readiness: f64,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            high_risk_failure_threshold: 0.25,
            low_revenue_threshold: 2_000_000.0,
            commercial_min_readiness: 60.0,
        }
    }
}

/// Load and validate governance thresholds from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_governance_config(path: &Path) -> Result<GovernanceConfig, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::GovernanceFileIo {
            path: path.display().to_string(),
            source: e,
        })?;

    let config: GovernanceConfig = serde_yaml::from_str(&content)?;
    validate_governance(&config)?;

    Ok(config)
}

fn validate_governance(config: &GovernanceConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.high_risk_failure_threshold) {
        return Err(ConfigError::Validation(format!(
            "high_risk_failure_threshold {} must be within 0..=1",
            config.high_risk_failure_threshold
        )));
    }

    if !config.low_revenue_threshold.is_finite() || config.low_revenue_threshold < 0.0 {
        return Err(ConfigError::Validation(format!(
            "low_revenue_threshold {} must be a non-negative number",
            config.low_revenue_threshold
        )));
    }

    if !(0.0..=100.0).contains(&config.commercial_min_readiness) {
        return Err(ConfigError::Validation(format!(
            "commercial_min_readiness {} must be within 0..=100",
            config.commercial_min_readiness
        )));
    }

    Ok(())
}
