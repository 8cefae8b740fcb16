//! Digital economy: growth, digital share of GDP and competitiveness.
//!
//! Growth deviates from the base rate in proportion to how far broadband and
//! skills sit above their starting levels. An optional `volatility` adds a
//! seeded Normal shock to yearly growth.

use crate::ids::{ECONOMY, INFRA, POLICY, SKILLS};
use crate::params::{self, ModuleParams};
use crate::shocks::ShockSource;
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;

pub const METRICS: MetricSchema =
    MetricSchema::new(&["gdp_growth", "digital_economy_share", "overall_competitiveness"]);

const BROADBAND_ANCHOR: f64 = 0.3;
const SKILLS_ANCHOR: f64 = 0.35;

/// Initial economy state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomyParams {
    /// Trend GDP growth rate
    pub base_growth: f64,

    /// Digital economy share of GDP (0-1)
    pub digital_economy_share: f64,

    /// Competitiveness index (0-1)
    pub overall_competitiveness: f64,

    /// Standard deviation of the yearly growth shock (0 disables it)
    pub volatility: f64,
}

impl Default for EconomyParams {
    fn default() -> Self {
        Self {
            base_growth: 0.06,
            digital_economy_share: 0.08,
            overall_competitiveness: 0.45,
            volatility: 0.0,
        }
    }
}

impl ModuleParams for EconomyParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        params::within(module, "base_growth", self.base_growth, -0.5, 0.5)?;
        params::share(module, "digital_economy_share", self.digital_economy_share)?;
        params::share(module, "overall_competitiveness", self.overall_competitiveness)?;
        params::within(module, "volatility", self.volatility, 0.0, 0.5)
    }
}

pub struct DigitalEconomy {
    state: EconomyParams,
    shocks: ShockSource,
}

impl DigitalEconomy {
    pub fn new(state: EconomyParams, seed: u64) -> Self {
        let shocks = ShockSource::new(seed, &ECONOMY, state.volatility);
        Self { state, shocks }
    }
}

impl SimModule for DigitalEconomy {
    fn id(&self) -> ModuleId {
        ECONOMY
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let broadband = inputs.metric_or(&INFRA, "broadband_penetration", BROADBAND_ANCHOR);
        let skills = inputs.metric_or(&SKILLS, "skills_index", SKILLS_ANCHOR);
        let incentive = inputs.metric_or(&POLICY, "investment_incentive", 0.1);
        let shock = self.shocks.draw();
        let s = &mut self.state;

        let gdp_growth = s.base_growth
            + 0.01 * (broadband - BROADBAND_ANCHOR)
            + 0.01 * (skills - SKILLS_ANCHOR)
            + 0.02 * incentive
            + shock;
        s.digital_economy_share = (s.digital_economy_share * (1.06 + 0.1 * broadband * skills)).min(1.0);
        s.overall_competitiveness = (s.overall_competitiveness + 0.02 * skills + 0.01 * incentive).min(1.0);

        ModuleOutput::builder()
            .float("gdp_growth", gdp_growth)
            .float("digital_economy_share", s.digital_economy_share)
            .float("overall_competitiveness", s.overall_competitiveness)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use digisim_kernel::Resolution;

    #[test]
    fn test_growth_at_anchor() {
        let out = DigitalEconomy::new(EconomyParams::default(), 0).step(2025, &ModuleInputs::new());

        assert_relative_eq!(out.get_f64("gdp_growth").unwrap(), 0.062, epsilon = 1e-12);
        assert_relative_eq!(
            out.get_f64("digital_economy_share").unwrap(),
            0.08 * (1.06 + 0.1 * 0.3 * 0.35),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_better_infrastructure_lifts_growth() {
        let infra: ModuleOutput = [("broadband_penetration", 0.8)].into_iter().collect();
        let mut inputs = ModuleInputs::new();
        inputs.insert(INFRA, &infra, Resolution::Current);

        let out = DigitalEconomy::new(EconomyParams::default(), 0).step(2025, &inputs);
        assert!(out.get_f64("gdp_growth").unwrap() > 0.062);
    }

    #[test]
    fn test_shocks_depend_on_seed() {
        let params = EconomyParams {
            volatility: 0.01,
            ..Default::default()
        };
        let inputs = ModuleInputs::new();
        let a = DigitalEconomy::new(params.clone(), 1).step(2025, &inputs);
        let b = DigitalEconomy::new(params.clone(), 1).step(2025, &inputs);
        let c = DigitalEconomy::new(params, 2).step(2025, &inputs);

        assert_eq!(a, b);
        assert_ne!(a.get_f64("gdp_growth"), c.get_f64("gdp_growth"));
    }
}
