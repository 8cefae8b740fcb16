//! Digital skills: literacy, ICT graduates and AI talent.
//!
//! Skills runs early in the year, before the modules it learns from, so all
//! three of its inputs are read from the previous year's snapshot.

use crate::ids::{ECONOMY, INCLUSION, SKILLS, SOCIETY};
use crate::params::{self, ModuleParams};
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;

pub const METRICS: MetricSchema = MetricSchema::new(&[
    "skills_index",
    "ict_graduates",
    "ai_talent",
    "relevant_sector_skill",
]);

/// Growth rate at which demand for skills is neutral.
const REFERENCE_GROWTH: f64 = 0.06;

/// Initial skills state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkillsParams {
    /// Composite digital skills index (0-1)
    pub skills_index: f64,

    /// ICT graduates per year
    pub ict_graduates: f64,

    /// AI professionals
    pub ai_talent: f64,

    /// Share of workforce with sector-relevant digital skills (0-1)
    pub relevant_sector_skill: f64,
}

impl Default for SkillsParams {
    fn default() -> Self {
        Self {
            skills_index: 0.35,
            ict_graduates: 10_000.0,
            ai_talent: 1_000.0,
            relevant_sector_skill: 0.2,
        }
    }
}

impl ModuleParams for SkillsParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        params::share(module, "skills_index", self.skills_index)?;
        params::non_negative(module, "ict_graduates", self.ict_graduates)?;
        params::non_negative(module, "ai_talent", self.ai_talent)?;
        params::share(module, "relevant_sector_skill", self.relevant_sector_skill)
    }
}

pub struct DigitalSkills {
    state: SkillsParams,
}

impl DigitalSkills {
    pub fn new(state: SkillsParams) -> Self {
        Self { state }
    }
}

impl SimModule for DigitalSkills {
    fn id(&self) -> ModuleId {
        SKILLS
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let demand = inputs.metric_or(&ECONOMY, "gdp_growth", REFERENCE_GROWTH) / REFERENCE_GROWTH;
        let literacy = inputs.metric_or(&INCLUSION, "overall_literacy", 0.45);
        let adoption = inputs.metric_or(&SOCIETY, "adoption_rate", 0.6);
        let s = &mut self.state;

        s.skills_index = (s.skills_index + 0.02 * literacy + 0.01 * adoption).min(1.0);
        s.ict_graduates *= 1.04 + 0.02 * demand;
        s.ai_talent *= 1.08 + 0.04 * demand * adoption;
        s.relevant_sector_skill = (s.relevant_sector_skill + 0.015 * demand + 0.01 * literacy).min(1.0);

        ModuleOutput::builder()
            .float("skills_index", s.skills_index)
            .float("ict_graduates", s.ict_graduates)
            .float("ai_talent", s.ai_talent)
            .float("relevant_sector_skill", s.relevant_sector_skill)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use digisim_kernel::Resolution;

    #[test]
    fn test_start_year_uses_defaults() {
        let mut inputs = ModuleInputs::new();
        inputs.insert_initial(ECONOMY);
        inputs.insert_initial(INCLUSION);
        inputs.insert_initial(SOCIETY);

        let out = DigitalSkills::new(SkillsParams::default()).step(2025, &inputs);

        assert_relative_eq!(out.get_f64("skills_index").unwrap(), 0.35 + 0.009 + 0.006, epsilon = 1e-12);
        assert_relative_eq!(out.get_f64("ict_graduates").unwrap(), 10_600.0, epsilon = 1e-9);

        let missing = inputs.take_missing();
        assert_eq!(missing.len(), 3);
        assert!(missing.iter().all(|m| m.initial));
    }

    #[test]
    fn test_faster_growth_trains_more_graduates() {
        let slow: ModuleOutput = [("gdp_growth", 0.03)].into_iter().collect();
        let fast: ModuleOutput = [("gdp_growth", 0.09)].into_iter().collect();

        let graduates = |economy: &ModuleOutput| {
            let mut inputs = ModuleInputs::new();
            inputs.insert(ECONOMY, economy, Resolution::Lagged);
            let out = DigitalSkills::new(SkillsParams::default()).step(2026, &inputs);
            out.get_f64("ict_graduates").unwrap()
        };

        assert!(graduates(&fast) > graduates(&slow));
    }
}
