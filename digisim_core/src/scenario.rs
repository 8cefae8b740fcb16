//! Policy scenarios: named bundles of lever values.
//!
//! A scenario is selected once, by name, when the simulation is built. It is
//! immutable for the whole run and only the Policy module reads it.

use digisim_kernel::ConfigError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Share of investment subsidized by policy.
pub const INVESTMENT_INCENTIVE: &str = "investment_incentive";
/// Breadth of the regulatory sandbox.
pub const REGULATORY_SANDBOX_SCOPE: &str = "regulatory_sandbox_scope";
/// Priority given to inclusion programmes (optional, default 0.5).
pub const INCLUSION_FOCUS: &str = "inclusion_focus";
/// Priority given to digital trade agreements (optional, default 0.4).
pub const TRADE_AGREEMENT_FOCUS: &str = "trade_agreement_focus";

/// Levers every scenario must define.
pub const REQUIRED_LEVERS: [&str; 2] = [INVESTMENT_INCENTIVE, REGULATORY_SANDBOX_SCOPE];

/// Scenarios shipped with the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScenario {
    /// Current policy trajectory
    Baseline,

    /// Stronger incentives, wider sandbox
    ProInvestment,

    /// Tighter regulation, weaker incentives
    ProRegulation,
}

impl BuiltinScenario {
    /// Returns a list of all built-in scenarios.
    pub fn all() -> Vec<BuiltinScenario> {
        vec![
            BuiltinScenario::Baseline,
            BuiltinScenario::ProInvestment,
            BuiltinScenario::ProRegulation,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinScenario::Baseline => "baseline",
            BuiltinScenario::ProInvestment => "pro_investment",
            BuiltinScenario::ProRegulation => "pro_regulation",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            BuiltinScenario::Baseline => "Current policy mix: modest incentives, moderate sandbox",
            BuiltinScenario::ProInvestment => "Aggressive investment incentives and a wide regulatory sandbox",
            BuiltinScenario::ProRegulation => "Regulation-first: minimal incentives, narrow sandbox",
        }
    }

    /// Returns the lever values.
    pub fn levers(&self) -> BTreeMap<String, f64> {
        let (incentive, sandbox) = match self {
            BuiltinScenario::Baseline => (0.1, 0.5),
            BuiltinScenario::ProInvestment => (0.3, 0.7),
            BuiltinScenario::ProRegulation => (0.05, 0.3),
        };
        BTreeMap::from([
            (INVESTMENT_INCENTIVE.to_string(), incentive),
            (REGULATORY_SANDBOX_SCOPE.to_string(), sandbox),
        ])
    }

    /// Builds the scenario value.
    pub fn scenario(&self) -> Scenario {
        Scenario {
            name: self.name().to_string(),
            description: self.description().to_string(),
            levers: self.levers(),
        }
    }
}

impl std::fmt::Display for BuiltinScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named, immutable bundle of lever values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    name: String,
    description: String,
    levers: BTreeMap<String, f64>,
}

impl Scenario {
    /// Creates a custom scenario, checking that the required levers exist
    /// and that every lever is a finite value `>= 0`.
    pub fn new(name: impl Into<String>, levers: BTreeMap<String, f64>) -> Result<Self, ConfigError> {
        let name = name.into();
        let invalid = |reason: String| ConfigError::InvalidScenario {
            name: name.clone(),
            reason,
        };

        if name.trim().is_empty() {
            return Err(invalid("scenario name is empty".to_string()));
        }
        for required in REQUIRED_LEVERS {
            if !levers.contains_key(required) {
                return Err(invalid(format!("missing lever '{}'", required)));
            }
        }
        if let Some((lever, value)) = levers.iter().find(|(_, v)| !v.is_finite() || **v < 0.0) {
            return Err(invalid(format!("lever '{}' must be finite and >= 0, got {}", lever, value)));
        }

        Ok(Self {
            name,
            description: "custom scenario".to_string(),
            levers,
        })
    }

    /// Scenario name (used as the run label).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Looks up a lever.
    pub fn lever(&self, lever: &str) -> Option<f64> {
        self.levers.get(lever).copied()
    }

    /// Looks up a lever, falling back to `default` for optional levers.
    pub fn lever_or(&self, lever: &str, default: f64) -> f64 {
        self.lever(lever).unwrap_or(default)
    }

    /// All levers, in name order.
    pub fn levers(&self) -> &BTreeMap<String, f64> {
        &self.levers
    }
}

/// The set of scenarios that can be selected for a run.
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioCatalog {
    /// Catalog with the built-in scenarios only.
    pub fn builtin() -> Self {
        let scenarios = BuiltinScenario::all()
            .into_iter()
            .map(|s| (s.name().to_string(), s.scenario()))
            .collect();
        Self { scenarios }
    }

    /// Adds a custom scenario. Built-in names cannot be redefined.
    pub fn with_custom(
        mut self,
        name: impl Into<String>,
        levers: BTreeMap<String, f64>,
    ) -> Result<Self, ConfigError> {
        let scenario = Scenario::new(name, levers)?;
        let key = scenario.name().to_lowercase();
        if self.scenarios.contains_key(&key) {
            return Err(ConfigError::InvalidScenario {
                name: scenario.name().to_string(),
                reason: "name already declared".to_string(),
            });
        }
        self.scenarios.insert(key, scenario);
        Ok(self)
    }

    /// Selects a scenario by name (case-insensitive).
    ///
    /// An unknown name is a configuration error; there is no fallback.
    pub fn select(&self, name: &str) -> Result<Scenario, ConfigError> {
        self.scenarios
            .get(&name.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| ConfigError::UnknownScenario {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// Declared scenario names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.scenarios.keys().cloned().collect()
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levers() {
        let s = ScenarioCatalog::builtin().select("pro_investment").unwrap();
        assert_eq!(s.lever(INVESTMENT_INCENTIVE), Some(0.3));
        assert_eq!(s.lever(REGULATORY_SANDBOX_SCOPE), Some(0.7));
        assert_eq!(s.lever_or(INCLUSION_FOCUS, 0.5), 0.5);
    }

    #[test]
    fn test_unknown_scenario_fails_fast() {
        let err = ScenarioCatalog::builtin().select("moonshot").unwrap_err();
        match err {
            ConfigError::UnknownScenario { name, available } => {
                assert_eq!(name, "moonshot");
                assert_eq!(available, vec!["baseline", "pro_investment", "pro_regulation"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_selection_is_case_insensitive() {
        assert!(ScenarioCatalog::builtin().select("Baseline").is_ok());
        assert_eq!(
            ScenarioCatalog::builtin().select("PRO_REGULATION").unwrap().name(),
            "pro_regulation"
        );
    }

    #[test]
    fn test_custom_scenarios() {
        let levers = BTreeMap::from([
            (INVESTMENT_INCENTIVE.to_string(), 0.2),
            (REGULATORY_SANDBOX_SCOPE.to_string(), 0.9),
            (TRADE_AGREEMENT_FOCUS.to_string(), 0.8),
        ]);
        let catalog = ScenarioCatalog::builtin().with_custom("export_push", levers).unwrap();
        let s = catalog.select("export_push").unwrap();
        assert_eq!(s.lever(TRADE_AGREEMENT_FOCUS), Some(0.8));
        assert_eq!(catalog.names().len(), 4);
    }

    #[test]
    fn test_custom_scenario_validation() {
        let missing = BTreeMap::from([(INVESTMENT_INCENTIVE.to_string(), 0.2)]);
        assert!(Scenario::new("partial", missing).is_err());

        let negative = BTreeMap::from([
            (INVESTMENT_INCENTIVE.to_string(), -0.2),
            (REGULATORY_SANDBOX_SCOPE.to_string(), 0.5),
        ]);
        assert!(Scenario::new("negative", negative).is_err());

        let ok = BuiltinScenario::Baseline.levers();
        assert!(ScenarioCatalog::builtin().with_custom("baseline", ok).is_err());
    }
}
