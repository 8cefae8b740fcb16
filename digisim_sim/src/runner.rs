//! Scenario runner - executes a configured run end to end.
//!
//! Builds the simulation, runs the full horizon, derives the normalized
//! table and collects every diagnostic into a [`RunReport`].

use crate::aggregation::{AggregationEngine, DerivedTable};
use crate::comparison::{compare, ScenarioComparison};
use crate::config::{Horizon, SimConfig};
use crate::orchestrator::Simulation;
use crate::results::ResultsHistory;
use digisim_kernel::{Diagnostic, MetricValue, ModuleId, SimError};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// Everything one scenario run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Scenario that was run
    pub label: String,

    /// Seed used
    pub seed: u64,

    pub horizon: Horizon,

    /// Module ids in execution order
    pub execution_order: Vec<ModuleId>,

    /// Sealed snapshots, one per year
    pub history: ResultsHistory,

    /// History plus normalized and composite columns
    pub derived: DerivedTable,

    /// Simulation and aggregation diagnostics, in recording order
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// Final-year values for reporting.
    pub fn summary(&self, exclude_derived: bool) -> BTreeMap<String, MetricValue> {
        self.derived.summary(exclude_derived)
    }

    /// Composite index of the final year.
    pub fn final_composite(&self) -> Option<f64> {
        self.derived.last().map(|row| row.composite())
    }

    /// Number of warning-level diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == digisim_kernel::Severity::Warning)
            .count()
    }
}

/// Runs scenarios from one configuration.
pub struct ScenarioRunner {
    config: SimConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(config: SimConfig) -> Self {
        Self { config, cancel: None }
    }

    /// Installs a cancellation flag shared by every run.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Aggregation engine over the configured indicators.
    pub fn engine(&self) -> AggregationEngine {
        match &self.config.indicators {
            Some(keys) => AggregationEngine::new().with_indicators(keys.iter().cloned()),
            None => AggregationEngine::new(),
        }
    }

    /// Runs the configured scenario.
    pub fn run(&self) -> Result<RunReport, SimError> {
        self.run_scenario(&self.config.scenario)
    }

    /// Runs `scenario` with the rest of the configuration unchanged.
    pub fn run_scenario(&self, scenario: &str) -> Result<RunReport, SimError> {
        let config = self.config.clone().with_scenario(scenario);
        let mut sim = Simulation::new(&config)?;
        if let Some(flag) = &self.cancel {
            sim = sim.with_cancel_flag(flag.clone());
        }

        sim.run()?;

        let label = sim.label().to_string();
        let horizon = sim.horizon();
        let execution_order = sim.execution_order();
        let mut log = sim.diagnostics().clone();
        let history = sim.into_history();
        let derived = self.engine().derive(&history, &mut log);

        info!(
            "Scenario '{}' done: composite {:.3}, {} diagnostics",
            label,
            derived.last().map_or(0.0, |row| row.composite()),
            log.len()
        );

        Ok(RunReport {
            label,
            seed: config.seed,
            horizon,
            execution_order,
            history,
            derived,
            diagnostics: log.into_entries(),
        })
    }

    /// Runs the configured scenario and `alternative`, then compares them.
    pub fn compare(&self, alternative: &str) -> Result<(RunReport, RunReport, ScenarioComparison), SimError> {
        let base = self.run()?;
        let alt = self.run_scenario(alternative)?;
        let comparison = compare(&base.label, &base.derived, &alt.label, &alt.derived);
        Ok((base, alt, comparison))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digisim_kernel::ConfigError;
    use std::sync::atomic::Ordering;

    fn short_config() -> SimConfig {
        SimConfig::default().with_years(2025, 2029).with_seed(3)
    }

    #[test]
    fn test_run_report() {
        let report = ScenarioRunner::new(short_config()).run().unwrap();

        assert_eq!(report.label, "baseline");
        assert_eq!(report.history.len(), 5);
        assert_eq!(report.derived.len(), 5);
        assert_eq!(report.execution_order.len(), 12);
        assert_eq!(report.warning_count(), 0);
        assert!(report.final_composite().is_some());
        assert!(report.summary(false).len() > report.summary(true).len());
    }

    #[test]
    fn test_same_seed_same_report() {
        let runner = ScenarioRunner::new(short_config());
        let a = runner.run().unwrap();
        let b = runner.run().unwrap();
        assert_eq!(a.history, b.history);
        assert_eq!(a.derived, b.derived);
    }

    #[test]
    fn test_custom_indicators() {
        let mut config = short_config();
        config.indicators = Some(vec!["economy_gdp_growth".to_string()]);
        let report = ScenarioRunner::new(config).run().unwrap();

        assert_eq!(report.derived.derived_keys().len(), 2);
        assert!(report.summary(false).contains_key("economy_gdp_growth_norm"));
    }

    #[test]
    fn test_compare_scenarios() {
        let (base, alt, cmp) = ScenarioRunner::new(short_config()).compare("pro_regulation").unwrap();
        assert_eq!(base.label, "baseline");
        assert_eq!(alt.label, "pro_regulation");
        assert_eq!(cmp.alternative, "pro_regulation");
        assert!(cmp.row("policy_sandbox_scope").unwrap().delta.unwrap() < 0.0);
    }

    #[test]
    fn test_unknown_scenario() {
        let err = ScenarioRunner::new(short_config()).run_scenario("nope").unwrap_err();
        assert!(matches!(err, SimError::Config(ConfigError::UnknownScenario { .. })));
    }

    #[test]
    fn test_cancelled_run() {
        let flag = Arc::new(AtomicBool::new(true));
        let runner = ScenarioRunner::new(short_config()).with_cancel_flag(flag.clone());
        assert_eq!(runner.run().unwrap_err(), SimError::Cancelled { next_year: 2025 });

        flag.store(false, Ordering::Relaxed);
        assert!(runner.run().is_ok());
    }
}
