//! Innovation ecosystem: startups, venture capital and R&D spending.
//!
//! Economic conditions reach the ecosystem with a one-year delay. An optional
//! `volatility` adds seeded Normal shocks to venture funding growth.

use crate::ids::{ECONOMY, INNOVATION, POLICY, SKILLS};
use crate::params::{self, ModuleParams};
use crate::shocks::ShockSource;
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;

pub const METRICS: MetricSchema = MetricSchema::new(&["startup_count", "vc_funding", "rd_investment_norm"]);

const REFERENCE_GROWTH: f64 = 0.06;

/// R&D spending is capped at this share of GDP (percent).
const RD_CAP: f64 = 2.0;

/// Initial innovation state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InnovationParams {
    /// Active tech startups
    pub active_tech_startups: i64,

    /// Venture funding (USD millions)
    pub vc_funding: f64,

    /// R&D spending (% of GDP)
    pub rd_spending_gdp_pct: f64,

    /// Standard deviation of the yearly funding shock (0 disables it)
    pub volatility: f64,
}

impl Default for InnovationParams {
    fn default() -> Self {
        Self {
            active_tech_startups: 1200,
            vc_funding: 150.0,
            rd_spending_gdp_pct: 0.3,
            volatility: 0.0,
        }
    }
}

impl ModuleParams for InnovationParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        if self.active_tech_startups < 0 {
            return Err(ConfigError::params(
                module,
                format!("'active_tech_startups' must be >= 0, got {}", self.active_tech_startups),
            ));
        }
        params::non_negative(module, "vc_funding", self.vc_funding)?;
        params::within(module, "rd_spending_gdp_pct", self.rd_spending_gdp_pct, 0.0, RD_CAP)?;
        params::within(module, "volatility", self.volatility, 0.0, 1.0)
    }
}

pub struct InnovationEcosystem {
    state: InnovationParams,
    shocks: ShockSource,
}

impl InnovationEcosystem {
    pub fn new(state: InnovationParams, seed: u64) -> Self {
        let shocks = ShockSource::new(seed, &INNOVATION, state.volatility);
        Self { state, shocks }
    }
}

impl SimModule for InnovationEcosystem {
    fn id(&self) -> ModuleId {
        INNOVATION
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let talent = inputs.metric_or(&SKILLS, "ict_graduates", 10_000.0) / 50_000.0;
        let support = inputs.metric_or(&POLICY, "startup_policy_score", 0.5);
        let climate = inputs.metric_or(&ECONOMY, "gdp_growth", REFERENCE_GROWTH) / REFERENCE_GROWTH;
        let shock = self.shocks.draw();
        let s = &mut self.state;

        let startup_growth = 1.05 + 0.1 * talent + 0.05 * support * climate;
        // Whole startups only; fractional growth is dropped each year.
        s.active_tech_startups = (s.active_tech_startups as f64 * startup_growth).max(0.0) as i64;
        s.vc_funding *= (1.1 + 0.15 * support * climate + shock).max(0.0);
        s.rd_spending_gdp_pct = (s.rd_spending_gdp_pct * (1.02 + 0.03 * support)).min(RD_CAP);

        ModuleOutput::builder()
            .count("startup_count", s.active_tech_startups)
            .float("vc_funding", s.vc_funding)
            .float("rd_investment_norm", s.rd_spending_gdp_pct)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use digisim_kernel::MetricValue;

    #[test]
    fn test_startups_are_whole_counts() {
        let params = InnovationParams {
            active_tech_startups: 1001,
            ..Default::default()
        };
        let mut m = InnovationEcosystem::new(params, 0);
        let out = m.step(2025, &ModuleInputs::new());

        // 1001 * (1.05 + 0.02 + 0.025) = 1096.095
        assert_eq!(out.get("startup_count"), Some(MetricValue::Count(1096)));
        assert_relative_eq!(out.get_f64("vc_funding").unwrap(), 150.0 * 1.175, epsilon = 1e-9);
        assert_relative_eq!(out.get_f64("rd_investment_norm").unwrap(), 0.3 * 1.035, epsilon = 1e-12);
    }

    #[test]
    fn test_rd_is_capped() {
        let params = InnovationParams {
            rd_spending_gdp_pct: 1.99,
            ..Default::default()
        };
        let mut m = InnovationEcosystem::new(params, 0);
        let out = m.step(2025, &ModuleInputs::new());
        assert_eq!(out.get_f64("rd_investment_norm"), Some(RD_CAP));
    }

    #[test]
    fn test_volatility_is_reproducible() {
        let params = InnovationParams {
            volatility: 0.05,
            ..Default::default()
        };
        let inputs = ModuleInputs::new();
        let mut a = InnovationEcosystem::new(params.clone(), 42);
        let mut b = InnovationEcosystem::new(params, 42);

        for year in 2025..2035 {
            assert_eq!(a.step(year, &inputs), b.step(year, &inputs));
        }
    }

    #[test]
    fn test_negative_startups_rejected() {
        let params = InnovationParams {
            active_tech_startups: -5,
            ..Default::default()
        };
        assert!(params.validate(&INNOVATION).is_err());
    }
}
