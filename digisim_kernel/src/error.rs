//! Error types for the simulation.

use crate::types::ModuleId;
use thiserror::Error;

/// Structurally invalid configuration, detected before any year runs.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Scenario name not declared in the catalog
    #[error("Unknown scenario '{name}' (available: {})", .available.join(", "))]
    UnknownScenario { name: String, available: Vec<String> },

    /// Scenario declared with missing or invalid levers
    #[error("Invalid scenario '{name}': {reason}")]
    InvalidScenario { name: String, reason: String },

    /// The CURRENT-only dependency subgraph contains a cycle
    #[error("Cyclic CURRENT dependency between modules: {}", display_ids(.involved))]
    CyclicDependency { involved: Vec<ModuleId> },

    /// A module id referenced by config or wiring is not registered
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// Two modules registered under the same id
    #[error("Duplicate module id: {0}")]
    DuplicateModule(ModuleId),

    /// The same consumer/producer pair declared twice
    #[error("Duplicate dependency {consumer} <- {producer}")]
    DuplicateDependency { consumer: ModuleId, producer: ModuleId },

    /// A LAGGED edge without the modeling assumption that justifies it
    #[error("LAGGED dependency {consumer} <- {producer} has no rationale")]
    UndocumentedLag { consumer: ModuleId, producer: ModuleId },

    /// Per-module parameters could not be parsed or are out of range
    #[error("Invalid parameters for module '{module}': {reason}")]
    InvalidModuleParams { module: String, reason: String },

    /// Start/end years are inconsistent
    #[error("Invalid horizon: {0}")]
    InvalidHorizon(String),

    /// A module declared an unusable metric schema
    #[error("Invalid metric schema for module '{module}': {reason}")]
    InvalidSchema { module: ModuleId, reason: String },

    /// Two modules produce the same namespaced snapshot key
    #[error("Metric key '{key}' is produced by both '{first}' and '{second}'")]
    MetricKeyCollision { key: String, first: ModuleId, second: ModuleId },
}

impl ConfigError {
    /// Creates an invalid-parameters error.
    pub fn params(module: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::InvalidModuleParams {
            module: module.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid-horizon error.
    pub fn horizon(msg: impl Into<String>) -> Self {
        Self::InvalidHorizon(msg.into())
    }

    /// Creates an invalid-schema error.
    pub fn schema(module: &ModuleId, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            module: module.clone(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by a simulation run.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// Fatal configuration problem (raised at construction)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A module returned outputs that do not match its declared schema
    #[error("Module '{module}' violated its metric schema in {year}: {detail}")]
    SchemaViolation {
        module: ModuleId,
        year: i32,
        detail: String,
    },

    /// The run was cancelled between years
    #[error("Simulation cancelled before year {next_year}")]
    Cancelled { next_year: i32 },
}

fn display_ids(ids: &[ModuleId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_scenario_lists_available() {
        let err = ConfigError::UnknownScenario {
            name: "moonshot".to_string(),
            available: vec!["baseline".to_string(), "pro_investment".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown scenario 'moonshot' (available: baseline, pro_investment)"
        );
    }

    #[test]
    fn test_cycle_message_names_modules() {
        let err = ConfigError::CyclicDependency {
            involved: vec![ModuleId::from_static("a"), ModuleId::from_static("b")],
        };
        assert!(err.to_string().contains("a, b"));
    }

    #[test]
    fn test_config_error_converts_into_sim_error() {
        let err: SimError = ConfigError::horizon("end before start").into();
        assert_eq!(err.to_string(), "Invalid horizon: end before start");
    }
}
