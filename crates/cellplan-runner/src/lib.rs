//! # cellplan-runner library
//!
//! Library interface for the cellplan CLI.
//!
//! This module holds everything the binary needs that is worth integration
//! testing on its own: scenario-file loading, result rendering in the four
//! output formats, and the append-only run history.

pub mod export;
pub mod history;

use cellplan_engine::{AnalysisOptions, ScenarioInput, ScenarioParams};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur in the CLI runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Engine rejected the scenario or a model refused to run.
    #[error("budget error: {0}")]
    Budget(#[from] cellplan_engine::BudgetError),

    /// Invalid geographic input.
    #[error("geo error: {0}")]
    Geo(#[from] cellplan_core::DomainError),

    /// Scenario validation failure.
    #[error(transparent)]
    Validation(#[from] cellplan_core::ValidationError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

// ============================================================================
// Scenario Files
// ============================================================================

/// One named entry of a scenario file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioEntry {
    /// Radio and geometry parameters; missing fields take the LTE defaults.
    #[serde(default)]
    pub scenario: ScenarioInput,
    /// Minimum indoor RSRP the deployment must deliver, in dBm.
    pub threshold_dbm: Option<f64>,
    /// Run the probabilistic coverage stage (default true).
    pub probabilistic: Option<bool>,
    /// Override the environment's shadowing spread, in dB.
    pub sigma_db: Option<f64>,
}

impl ScenarioEntry {
    /// Resolve the analysis options of this entry.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            probabilistic: self.probabilistic.unwrap_or(true),
            sigma_override_db: self.sigma_db,
        }
    }
}

/// A YAML scenario file: named scenarios plus a file-wide default threshold.
///
/// ```yaml
/// default_threshold_dbm: -100.0
/// scenarios:
///   office-downtown:
///     scenario:
///       frequency_mhz: 3500.0
///       distance_m: 300.0
///       environment: dense-urban
///     threshold_dbm: -95.0
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    /// Threshold applied to entries that do not set their own, in dBm.
    #[serde(default = "default_threshold_dbm")]
    pub default_threshold_dbm: f64,
    /// Named scenarios, evaluated in name order.
    pub scenarios: BTreeMap<String, ScenarioEntry>,
}

fn default_threshold_dbm() -> f64 {
    -100.0
}

impl ScenarioFile {
    /// Load and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self, RunnerError> {
        let text = std::fs::read_to_string(path)?;
        let file: ScenarioFile = serde_yaml::from_str(&text)?;
        if file.scenarios.is_empty() {
            return Err(RunnerError::Config(format!(
                "scenario file {} defines no scenarios",
                path.display()
            )));
        }
        Ok(file)
    }

    /// Threshold for a given entry, falling back to the file-wide default.
    pub fn threshold_for(&self, entry: &ScenarioEntry) -> f64 {
        entry.threshold_dbm.unwrap_or(self.default_threshold_dbm)
    }

    /// Look up one named scenario, validated.
    pub fn resolve(&self, name: &str) -> Result<(ScenarioParams, &ScenarioEntry), RunnerError> {
        let entry = self.scenarios.get(name).ok_or_else(|| {
            RunnerError::Config(format!(
                "unknown scenario '{name}' (available: {})",
                self.scenarios
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;
        let params = ScenarioParams::new(entry.scenario.clone())?;
        Ok((params, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellplan_engine::Environment;

    const SAMPLE: &str = r#"
default_threshold_dbm: -102.0
scenarios:
  office:
    scenario:
      frequency_mhz: 3500.0
      distance_m: 300.0
      environment: dense-urban
    threshold_dbm: -95.0
  warehouse:
    scenario:
      distance_m: 1200.0
    probabilistic: false
"#;

    #[test]
    fn test_parse_sample_file() {
        let file: ScenarioFile = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(file.scenarios.len(), 2);

        let (params, entry) = file.resolve("office").unwrap();
        assert_eq!(params.frequency_mhz(), 3500.0);
        assert_eq!(params.environment(), Environment::DenseUrban);
        assert_eq!(file.threshold_for(entry), -95.0);
        assert!(entry.analysis_options().probabilistic);

        let (params, entry) = file.resolve("warehouse").unwrap();
        // Unset fields fall back to the LTE defaults.
        assert_eq!(params.frequency_mhz(), 1800.0);
        assert_eq!(params.distance_m(), 1200.0);
        assert_eq!(file.threshold_for(entry), -102.0);
        assert!(!entry.analysis_options().probabilistic);
    }

    #[test]
    fn test_unknown_scenario_lists_available() {
        let file: ScenarioFile = serde_yaml::from_str(SAMPLE).unwrap();
        let err = file.resolve("basement").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("basement"));
        assert!(message.contains("office"));
        assert!(message.contains("warehouse"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let text = "scenarios:\n  a:\n    scenario: {}\n    tx_power_dbm: 43.0\n";
        assert!(serde_yaml::from_str::<ScenarioFile>(text).is_err());
    }

    #[test]
    fn test_out_of_range_scenario_rejected_on_resolve() {
        let text = "scenarios:\n  hot:\n    scenario:\n      tx_power_dbm: 99.0\n";
        let file: ScenarioFile = serde_yaml::from_str(text).unwrap();
        assert!(matches!(
            file.resolve("hot"),
            Err(RunnerError::Validation(_))
        ));
    }
}
