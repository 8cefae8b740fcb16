//! Cybersecurity: threat landscape, protection systems and digital trust.
//!
//! Society runs after this module, so adoption is taken from last year.

use crate::ids::{CYBER, INFRA, POLICY, SOCIETY};
use crate::params::{self, ModuleParams};
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;

pub const METRICS: MetricSchema = MetricSchema::new(&["threat_level", "protection_level", "trust_level"]);

/// Initial security state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CyberParams {
    /// Phishing rate (0-1)
    pub phishing_rate: f64,

    /// Security operations centre coverage (0-1)
    pub soc_coverage: f64,

    /// Digital signature adoption (0-1)
    pub digital_signature_adoption: f64,
}

impl Default for CyberParams {
    fn default() -> Self {
        Self {
            phishing_rate: 0.15,
            soc_coverage: 0.3,
            digital_signature_adoption: 0.2,
        }
    }
}

impl ModuleParams for CyberParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        params::share(module, "phishing_rate", self.phishing_rate)?;
        params::share(module, "soc_coverage", self.soc_coverage)?;
        params::share(module, "digital_signature_adoption", self.digital_signature_adoption)
    }
}

pub struct Cybersecurity {
    state: CyberParams,
}

impl Cybersecurity {
    pub fn new(state: CyberParams) -> Self {
        Self { state }
    }
}

impl SimModule for Cybersecurity {
    fn id(&self) -> ModuleId {
        CYBER
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let exposure = inputs.metric_or(&INFRA, "overall_penetration", 0.6);
        let effectiveness = inputs.metric_or(&POLICY, "policy_effectiveness", 0.5);
        let adoption = inputs.metric_or(&SOCIETY, "adoption_rate", 0.5);
        let s = &mut self.state;

        // More people online means a larger attack surface.
        s.phishing_rate = (s.phishing_rate * (1.0 + 0.05 * exposure)).min(1.0);
        s.soc_coverage = (s.soc_coverage + 0.03 * effectiveness).min(1.0);
        s.digital_signature_adoption = (s.digital_signature_adoption + 0.04 * adoption).min(1.0);

        ModuleOutput::builder()
            .float("threat_level", s.phishing_rate)
            .float("protection_level", s.soc_coverage)
            .float("trust_level", s.digital_signature_adoption)
            .build()
    }
}
