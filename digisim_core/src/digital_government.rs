//! Digital government: e-services, digital ID and open data.

use crate::ids::{GOV, INFRA, POLICY};
use crate::params::{self, ModuleParams};
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;

pub const METRICS: MetricSchema =
    MetricSchema::new(&["e_service_coverage", "digital_id_coverage", "open_data_maturity"]);

/// Initial government state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GovParams {
    /// Share of public services offered online (0-1)
    pub e_service_coverage: f64,

    /// Population with a digital ID (0-1)
    pub digital_id_coverage: f64,

    /// Open data maturity (0-1)
    pub open_data_maturity: f64,
}

impl Default for GovParams {
    fn default() -> Self {
        Self {
            e_service_coverage: 0.35,
            digital_id_coverage: 0.7,
            open_data_maturity: 0.3,
        }
    }
}

impl ModuleParams for GovParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        params::share(module, "e_service_coverage", self.e_service_coverage)?;
        params::share(module, "digital_id_coverage", self.digital_id_coverage)?;
        params::share(module, "open_data_maturity", self.open_data_maturity)
    }
}

pub struct DigitalGovernment {
    state: GovParams,
}

impl DigitalGovernment {
    pub fn new(state: GovParams) -> Self {
        Self { state }
    }
}

impl SimModule for DigitalGovernment {
    fn id(&self) -> ModuleId {
        GOV
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let reach = inputs.metric_or(&INFRA, "overall_penetration", 0.6);
        let effectiveness = inputs.metric_or(&POLICY, "policy_effectiveness", 0.5);
        let s = &mut self.state;

        s.e_service_coverage += (1.0 - s.e_service_coverage) * 0.05 * (reach + effectiveness);
        s.digital_id_coverage += (1.0 - s.digital_id_coverage) * 0.08 * reach;
        s.open_data_maturity = (s.open_data_maturity + 0.02 * effectiveness).min(1.0);

        ModuleOutput::builder()
            .float("e_service_coverage", s.e_service_coverage.min(1.0))
            .float("digital_id_coverage", s.digital_id_coverage.min(1.0))
            .float("open_data_maturity", s.open_data_maturity)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_government_step() {
        let out = DigitalGovernment::new(GovParams::default()).step(2025, &ModuleInputs::new());

        assert_relative_eq!(
            out.get_f64("e_service_coverage").unwrap(),
            0.35 + 0.65 * 0.05 * 1.1,
            epsilon = 1e-12
        );
        assert_relative_eq!(out.get_f64("digital_id_coverage").unwrap(), 0.7 + 0.3 * 0.048, epsilon = 1e-12);
        assert_relative_eq!(out.get_f64("open_data_maturity").unwrap(), 0.31, epsilon = 1e-12);
    }
}
