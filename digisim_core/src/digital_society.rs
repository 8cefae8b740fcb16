//! Digital society: adoption, trust in digital services and online content.

use crate::ids::{CYBER, INCLUSION, INFRA, SOCIETY};
use crate::params::{self, ModuleParams};
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;

pub const METRICS: MetricSchema =
    MetricSchema::new(&["adoption_rate", "trust_score", "content_creation_index"]);

/// Initial society state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocietyParams {
    /// Internet penetration among the population (0-1)
    pub internet_penetration_rate: f64,

    /// Trust in digital services (0-1)
    pub digital_service_trust_score: f64,

    /// Local-language content creation (0-1)
    pub content_creation_index: f64,
}

impl Default for SocietyParams {
    fn default() -> Self {
        Self {
            internet_penetration_rate: 0.6,
            digital_service_trust_score: 0.5,
            content_creation_index: 0.4,
        }
    }
}

impl ModuleParams for SocietyParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        params::share(module, "internet_penetration_rate", self.internet_penetration_rate)?;
        params::share(module, "digital_service_trust_score", self.digital_service_trust_score)?;
        params::share(module, "content_creation_index", self.content_creation_index)
    }
}

pub struct DigitalSociety {
    state: SocietyParams,
}

impl DigitalSociety {
    pub fn new(state: SocietyParams) -> Self {
        Self { state }
    }
}

impl SimModule for DigitalSociety {
    fn id(&self) -> ModuleId {
        SOCIETY
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let access = inputs.metric_or(&INFRA, "overall_penetration", 0.6);
        let literacy = inputs.metric_or(&INCLUSION, "overall_literacy", 0.45);
        let trust = inputs.metric_or(&CYBER, "trust_level", 0.5);
        let s = &mut self.state;

        let headroom = 1.0 - s.internet_penetration_rate;
        s.internet_penetration_rate =
            (s.internet_penetration_rate + 0.05 * headroom * access * literacy).min(1.0);
        s.digital_service_trust_score = (s.digital_service_trust_score * (1.01 + 0.05 * trust)).min(1.0);
        s.content_creation_index = (s.content_creation_index + 0.02 * literacy).min(1.0);

        ModuleOutput::builder()
            .float("adoption_rate", s.internet_penetration_rate)
            .float("trust_score", s.digital_service_trust_score)
            .float("content_creation_index", s.content_creation_index)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_adoption_is_logistic() {
        let mut m = DigitalSociety::new(SocietyParams::default());
        let inputs = ModuleInputs::new();

        let first = m.step(2025, &inputs);
        assert_relative_eq!(
            first.get_f64("adoption_rate").unwrap(),
            0.6 + 0.05 * 0.4 * 0.6 * 0.45,
            epsilon = 1e-12
        );

        let mut previous = first.get_f64("adoption_rate").unwrap();
        for year in 2026..2100 {
            let next = m.step(year, &inputs).get_f64("adoption_rate").unwrap();
            assert!(next >= previous && next <= 1.0);
            previous = next;
        }
    }
}
