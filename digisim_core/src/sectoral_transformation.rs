//! Sectoral transformation: digitalization of agriculture, manufacturing,
//! health, education and finance.

use crate::ids::{ECONOMY, EMERGING, INFRA, SECTORAL, SKILLS};
use crate::params::{self, ModuleParams};
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;

pub const METRICS: MetricSchema = MetricSchema::new(&[
    "agri_digital_index",
    "mfg_digital_index",
    "health_digital_index",
    "edu_digital_index",
    "fin_digital_index",
]);

/// Initial sector state, all shares in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectoralParams {
    pub precision_farming_adoption: f64,
    pub industrial_iot_adoption: f64,
    pub telemedicine_penetration: f64,
    pub lms_adoption_schools: f64,
    pub digital_banking_users: f64,
}

impl Default for SectoralParams {
    fn default() -> Self {
        Self {
            precision_farming_adoption: 0.05,
            industrial_iot_adoption: 0.1,
            telemedicine_penetration: 0.1,
            lms_adoption_schools: 0.25,
            digital_banking_users: 0.4,
        }
    }
}

impl ModuleParams for SectoralParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        params::share(module, "precision_farming_adoption", self.precision_farming_adoption)?;
        params::share(module, "industrial_iot_adoption", self.industrial_iot_adoption)?;
        params::share(module, "telemedicine_penetration", self.telemedicine_penetration)?;
        params::share(module, "lms_adoption_schools", self.lms_adoption_schools)?;
        params::share(module, "digital_banking_users", self.digital_banking_users)
    }
}

pub struct SectoralTransformation {
    state: SectoralParams,
}

impl SectoralTransformation {
    pub fn new(state: SectoralParams) -> Self {
        Self { state }
    }
}

impl SimModule for SectoralTransformation {
    fn id(&self) -> ModuleId {
        SECTORAL
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let infra = inputs.metric_or(&INFRA, "broadband_penetration", 0.3);
        let skills = inputs.metric_or(&SKILLS, "relevant_sector_skill", 0.2);
        let tech = inputs.metric_or(&EMERGING, "ai_adoption", 0.1);
        let digital_share = inputs.metric_or(&ECONOMY, "digital_economy_share", 0.08);
        let s = &mut self.state;

        let grow = |value: f64, rate: f64| (value * rate).min(1.0);
        s.precision_farming_adoption = grow(s.precision_farming_adoption, 1.05 + 0.1 * infra * tech);
        s.industrial_iot_adoption = grow(s.industrial_iot_adoption, 1.1 + 0.15 * infra * skills * tech);
        s.telemedicine_penetration = grow(s.telemedicine_penetration, 1.12 + 0.1 * infra * skills);
        s.lms_adoption_schools = grow(s.lms_adoption_schools, 1.08 + 0.08 * infra);
        s.digital_banking_users = grow(s.digital_banking_users, 1.06 + 0.05 * infra + 0.05 * digital_share);

        ModuleOutput::builder()
            .float("agri_digital_index", s.precision_farming_adoption)
            .float("mfg_digital_index", s.industrial_iot_adoption)
            .float("health_digital_index", s.telemedicine_penetration)
            .float("edu_digital_index", s.lms_adoption_schools)
            .float("fin_digital_index", s.digital_banking_users)
            .build()
    }
}
