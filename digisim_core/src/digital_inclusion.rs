//! Digital inclusion: literacy, the gender gap and rural access.

use crate::ids::{INCLUSION, INFRA, POLICY, SKILLS};
use crate::params::{self, ModuleParams};
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;

pub const METRICS: MetricSchema = MetricSchema::new(&["overall_literacy", "gender_gap_index", "rural_access"]);

/// Initial inclusion state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InclusionParams {
    /// Basic digital literacy rate (0-1)
    pub basic_digital_literacy_rate: f64,

    /// Female internet usage rate (0-1)
    pub female_internet_usage_rate: f64,

    /// Rural broadband penetration (0-1)
    pub rural_broadband_penetration: f64,
}

impl Default for InclusionParams {
    fn default() -> Self {
        Self {
            basic_digital_literacy_rate: 0.45,
            female_internet_usage_rate: 0.35,
            rural_broadband_penetration: 0.2,
        }
    }
}

impl ModuleParams for InclusionParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        params::share(module, "basic_digital_literacy_rate", self.basic_digital_literacy_rate)?;
        params::share(module, "female_internet_usage_rate", self.female_internet_usage_rate)?;
        params::share(module, "rural_broadband_penetration", self.rural_broadband_penetration)
    }
}

pub struct DigitalInclusion {
    state: InclusionParams,
}

impl DigitalInclusion {
    pub fn new(state: InclusionParams) -> Self {
        Self { state }
    }
}

impl SimModule for DigitalInclusion {
    fn id(&self) -> ModuleId {
        INCLUSION
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let access = inputs.metric_or(&INFRA, "rural_coverage", 0.2);
        let policy = inputs.metric_or(&POLICY, "inclusion_policy_score", 0.5);
        let skills = inputs.metric_or(&SKILLS, "skills_index", 0.35);
        let s = &mut self.state;

        s.basic_digital_literacy_rate =
            (s.basic_digital_literacy_rate + 0.03 * policy * access + 0.01 * skills).min(1.0);
        s.female_internet_usage_rate = (s.female_internet_usage_rate + 0.025 * policy).min(1.0);
        s.rural_broadband_penetration = (s.rural_broadband_penetration + 0.04 * access).min(1.0);

        ModuleOutput::builder()
            .float("overall_literacy", s.basic_digital_literacy_rate)
            .float(
                "gender_gap_index",
                s.basic_digital_literacy_rate - s.female_internet_usage_rate,
            )
            .float("rural_access", s.rural_broadband_penetration)
            .build()
    }
}
