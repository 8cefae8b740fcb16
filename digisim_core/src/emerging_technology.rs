//! Emerging technology: AI, IoT and blockchain adoption.

use crate::ids::{EMERGING, INFRA, INNOVATION, SKILLS};
use crate::params::{self, ModuleParams};
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;

pub const METRICS: MetricSchema = MetricSchema::new(&["ai_adoption", "iot_density", "blockchain_activity"]);

/// Initial technology state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmergingParams {
    /// Share of businesses using AI (0-1)
    pub ai_adoption_rate: f64,

    /// Connected IoT devices (millions)
    pub iot_devices_millions: f64,

    /// Active blockchain pilots
    pub blockchain_pilots: i64,
}

impl Default for EmergingParams {
    fn default() -> Self {
        Self {
            ai_adoption_rate: 0.05,
            iot_devices_millions: 5.0,
            blockchain_pilots: 15,
        }
    }
}

impl ModuleParams for EmergingParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        params::share(module, "ai_adoption_rate", self.ai_adoption_rate)?;
        params::non_negative(module, "iot_devices_millions", self.iot_devices_millions)?;
        if self.blockchain_pilots < 0 {
            return Err(ConfigError::params(
                module,
                format!("'blockchain_pilots' must be >= 0, got {}", self.blockchain_pilots),
            ));
        }
        Ok(())
    }
}

pub struct EmergingTechnology {
    state: EmergingParams,
}

impl EmergingTechnology {
    pub fn new(state: EmergingParams) -> Self {
        Self { state }
    }
}

impl SimModule for EmergingTechnology {
    fn id(&self) -> ModuleId {
        EMERGING
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let talent = inputs.metric_or(&SKILLS, "ai_talent", 1_000.0) / 10_000.0;
        let rd = inputs.metric_or(&INNOVATION, "rd_investment_norm", 0.1);
        let broadband = inputs.metric_or(&INFRA, "broadband_penetration", 0.3);
        let s = &mut self.state;

        s.ai_adoption_rate = (s.ai_adoption_rate * (1.1 + 0.2 * talent)).min(1.0);
        s.iot_devices_millions *= 1.15 + 0.1 * rd + 0.05 * broadband;
        // Between two and seven new pilots a year.
        s.blockchain_pilots += (2.0 + 5.0 * rd.clamp(0.0, 1.0)) as i64;

        ModuleOutput::builder()
            .float("ai_adoption", s.ai_adoption_rate)
            .float("iot_density", s.iot_devices_millions)
            .count("blockchain_activity", s.blockchain_pilots)
            .build()
    }
}
