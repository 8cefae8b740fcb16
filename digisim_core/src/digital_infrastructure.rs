//! Digital infrastructure: broadband, rural coverage and international bandwidth.
//!
//! Growth is logistic toward full coverage and scaled by the policy
//! investment incentive of the same year.

use crate::ids::{INFRA, POLICY};
use crate::params::{self, ModuleParams};
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;

pub const METRICS: MetricSchema = MetricSchema::new(&[
    "broadband_penetration",
    "rural_coverage",
    "overall_penetration",
    "international_bandwidth",
]);

/// Initial infrastructure state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InfraParams {
    /// Fixed broadband penetration (0-1)
    pub broadband_penetration: f64,

    /// Rural network coverage (0-1)
    pub rural_coverage: f64,

    /// Overall internet penetration (0-1)
    pub overall_penetration: f64,

    /// International bandwidth (Tbps)
    pub international_bandwidth: f64,
}

impl Default for InfraParams {
    fn default() -> Self {
        Self {
            broadband_penetration: 0.3,
            rural_coverage: 0.2,
            overall_penetration: 0.6,
            international_bandwidth: 10.0,
        }
    }
}

impl ModuleParams for InfraParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        params::share(module, "broadband_penetration", self.broadband_penetration)?;
        params::share(module, "rural_coverage", self.rural_coverage)?;
        params::share(module, "overall_penetration", self.overall_penetration)?;
        params::non_negative(module, "international_bandwidth", self.international_bandwidth)
    }
}

pub struct DigitalInfrastructure {
    state: InfraParams,
}

impl DigitalInfrastructure {
    pub fn new(state: InfraParams) -> Self {
        Self { state }
    }
}

impl SimModule for DigitalInfrastructure {
    fn id(&self) -> ModuleId {
        INFRA
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let incentive = inputs.metric_or(&POLICY, "investment_incentive", 0.1);
        let s = &mut self.state;

        s.broadband_penetration += (1.0 - s.broadband_penetration) * (0.04 + 0.1 * incentive);
        s.rural_coverage += (1.0 - s.rural_coverage) * (0.03 + 0.08 * incentive);
        s.overall_penetration += (1.0 - s.overall_penetration) * 0.05 * (1.0 + incentive);
        s.international_bandwidth *= 1.12 + 0.2 * incentive;

        ModuleOutput::builder()
            .float("broadband_penetration", s.broadband_penetration.min(1.0))
            .float("rural_coverage", s.rural_coverage.min(1.0))
            .float("overall_penetration", s.overall_penetration.min(1.0))
            .float("international_bandwidth", s.international_bandwidth)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use digisim_kernel::Resolution;

    #[test]
    fn test_growth_scales_with_incentive() {
        let low: ModuleOutput = [("investment_incentive", 0.05)].into_iter().collect();
        let high: ModuleOutput = [("investment_incentive", 0.3)].into_iter().collect();

        let run = |policy: &ModuleOutput| {
            let mut inputs = ModuleInputs::new();
            inputs.insert(POLICY, policy, Resolution::Current);
            DigitalInfrastructure::new(InfraParams::default()).step(2025, &inputs)
        };

        let a = run(&low);
        let b = run(&high);
        assert!(b.get_f64("broadband_penetration").unwrap() > a.get_f64("broadband_penetration").unwrap());
        assert_relative_eq!(
            a.get_f64("broadband_penetration").unwrap(),
            0.3 + 0.7 * 0.045,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_missing_policy_uses_default() {
        let inputs = ModuleInputs::new();
        let out = DigitalInfrastructure::new(InfraParams::default()).step(2025, &inputs);

        assert_relative_eq!(out.get_f64("international_bandwidth").unwrap(), 10.0 * 1.14, epsilon = 1e-12);
        let missing = inputs.take_missing();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].metric, "investment_incentive");
    }

    #[test]
    fn test_coverage_never_exceeds_one() {
        let mut m = DigitalInfrastructure::new(InfraParams::default());
        let inputs = ModuleInputs::new();
        for year in 2025..2200 {
            let out = m.step(year, &inputs);
            assert!(out.get_f64("rural_coverage").unwrap() <= 1.0);
        }
    }
}
