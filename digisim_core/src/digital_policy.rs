//! Digital policy: legal frameworks, regulators and the scenario levers.
//!
//! The only module that reads the selected [`Scenario`]. It has no
//! dependencies and runs first; everything policy-related downstream reads
//! the levers through this module's outputs.

use crate::ids::POLICY;
use crate::params::{self, ModuleParams};
use crate::scenario::{
    Scenario, INCLUSION_FOCUS, INVESTMENT_INCENTIVE, REGULATORY_SANDBOX_SCOPE, TRADE_AGREEMENT_FOCUS,
};
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;
use tracing::debug;

pub const METRICS: MetricSchema = MetricSchema::new(&[
    "policy_effectiveness",
    "data_protection_score",
    "investment_incentive",
    "sandbox_scope",
    "startup_policy_score",
    "inclusion_policy_score",
    "trade_agreement_focus",
]);

const DEFAULT_INCLUSION_FOCUS: f64 = 0.5;
const DEFAULT_TRADE_AGREEMENT_FOCUS: f64 = 0.4;

/// Initial policy state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyParams {
    /// Data protection authority effectiveness (0-1)
    pub dpa_effectiveness: f64,

    /// Alignment with regional data-flow regimes (0-1)
    pub regional_data_flow_alignment: f64,

    /// Status of the data protection law (0-1)
    pub data_protection_law_status: f64,
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            dpa_effectiveness: 0.4,
            regional_data_flow_alignment: 0.3,
            data_protection_law_status: 0.6,
        }
    }
}

impl ModuleParams for PolicyParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        params::share(module, "dpa_effectiveness", self.dpa_effectiveness)?;
        params::share(module, "regional_data_flow_alignment", self.regional_data_flow_alignment)?;
        params::share(module, "data_protection_law_status", self.data_protection_law_status)
    }
}

/// Lever values resolved once from the scenario.
#[derive(Debug, Clone, Copy)]
struct Levers {
    investment_incentive: f64,
    sandbox_scope: f64,
    inclusion_focus: f64,
    trade_agreement_focus: f64,
}

pub struct DigitalPolicy {
    state: PolicyParams,
    levers: Levers,
}

impl DigitalPolicy {
    /// Creates the module for a validated scenario.
    pub fn new(state: PolicyParams, scenario: &Scenario) -> Self {
        // Scenario::new guarantees both required levers.
        let levers = Levers {
            investment_incentive: scenario.lever_or(INVESTMENT_INCENTIVE, 0.0),
            sandbox_scope: scenario.lever_or(REGULATORY_SANDBOX_SCOPE, 0.0),
            inclusion_focus: scenario.lever_or(INCLUSION_FOCUS, DEFAULT_INCLUSION_FOCUS),
            trade_agreement_focus: scenario.lever_or(TRADE_AGREEMENT_FOCUS, DEFAULT_TRADE_AGREEMENT_FOCUS),
        };
        debug!("Policy levers for scenario '{}': {:?}", scenario.name(), levers);
        Self { state, levers }
    }
}

impl SimModule for DigitalPolicy {
    fn id(&self) -> ModuleId {
        POLICY
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, _inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let l = self.levers;
        let s = &mut self.state;

        s.dpa_effectiveness = (s.dpa_effectiveness * 1.03 + l.investment_incentive * 0.02).min(1.0);
        s.regional_data_flow_alignment =
            (s.regional_data_flow_alignment + 0.02 + l.sandbox_scope * 0.03).min(1.0);
        s.data_protection_law_status =
            (s.data_protection_law_status + 0.015 * s.dpa_effectiveness).min(1.0);

        let inclusion_policy_score =
            (l.inclusion_focus * (0.5 + 0.5 * s.dpa_effectiveness) + 0.25).min(1.0);
        let trade_agreement_focus =
            (l.trade_agreement_focus * (0.5 + s.regional_data_flow_alignment)).min(1.0);

        ModuleOutput::builder()
            .float("policy_effectiveness", s.dpa_effectiveness)
            .float("data_protection_score", s.data_protection_law_status)
            .float("investment_incentive", l.investment_incentive)
            .float("sandbox_scope", l.sandbox_scope)
            .float("startup_policy_score", l.investment_incentive * 2.0 + l.sandbox_scope)
            .float("inclusion_policy_score", inclusion_policy_score)
            .float("trade_agreement_focus", trade_agreement_focus)
            .build()
    }
}
