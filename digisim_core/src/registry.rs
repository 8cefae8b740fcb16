//! Builds the twelve sub-models from configuration.

use crate::cybersecurity::{CyberParams, Cybersecurity};
use crate::digital_economy::{DigitalEconomy, EconomyParams};
use crate::digital_government::{DigitalGovernment, GovParams};
use crate::digital_inclusion::{DigitalInclusion, InclusionParams};
use crate::digital_infrastructure::{DigitalInfrastructure, InfraParams};
use crate::digital_policy::{DigitalPolicy, PolicyParams};
use crate::digital_skills::{DigitalSkills, SkillsParams};
use crate::digital_society::{DigitalSociety, SocietyParams};
use crate::emerging_technology::{EmergingParams, EmergingTechnology};
use crate::ids::{self, *};
use crate::innovation_ecosystem::{InnovationEcosystem, InnovationParams};
use crate::international_integration::{IntegrationParams, InternationalIntegration};
use crate::params::parse;
use crate::scenario::Scenario;
use crate::sectoral_transformation::{SectoralParams, SectoralTransformation};
use digisim_kernel::{ConfigError, ModuleId, SimModule};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Instantiates every sub-model in registration order.
///
/// `params` maps module ids to free-form JSON objects; absent modules get
/// their default initial state. Keys that name no module are rejected.
pub fn build_modules(
    scenario: &Scenario,
    params: &BTreeMap<String, Value>,
    seed: u64,
) -> Result<Vec<Box<dyn SimModule>>, ConfigError> {
    if let Some(unknown) = params.keys().find(|k| !ids::is_known(k)) {
        return Err(ConfigError::UnknownModule(unknown.clone()));
    }
    let raw = |id: &ModuleId| params.get(id.as_str());

    let modules: Vec<Box<dyn SimModule>> = vec![
        Box::new(DigitalPolicy::new(parse::<PolicyParams>(&POLICY, raw(&POLICY))?, scenario)),
        Box::new(DigitalInfrastructure::new(parse::<InfraParams>(&INFRA, raw(&INFRA))?)),
        Box::new(DigitalSkills::new(parse::<SkillsParams>(&SKILLS, raw(&SKILLS))?)),
        Box::new(DigitalInclusion::new(parse::<InclusionParams>(&INCLUSION, raw(&INCLUSION))?)),
        Box::new(Cybersecurity::new(parse::<CyberParams>(&CYBER, raw(&CYBER))?)),
        Box::new(DigitalSociety::new(parse::<SocietyParams>(&SOCIETY, raw(&SOCIETY))?)),
        Box::new(InnovationEcosystem::new(
            parse::<InnovationParams>(&INNOVATION, raw(&INNOVATION))?,
            seed,
        )),
        Box::new(EmergingTechnology::new(parse::<EmergingParams>(&EMERGING, raw(&EMERGING))?)),
        Box::new(DigitalEconomy::new(parse::<EconomyParams>(&ECONOMY, raw(&ECONOMY))?, seed)),
        Box::new(SectoralTransformation::new(parse::<SectoralParams>(&SECTORAL, raw(&SECTORAL))?)),
        Box::new(DigitalGovernment::new(parse::<GovParams>(&GOV, raw(&GOV))?)),
        Box::new(InternationalIntegration::new(parse::<IntegrationParams>(
            &INTEGRATION,
            raw(&INTEGRATION),
        )?)),
    ];

    debug!(
        "Built {} modules for scenario '{}' (seed {})",
        modules.len(),
        scenario.name(),
        seed
    );
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::BuiltinScenario;
    use serde_json::json;

    #[test]
    fn test_builds_all_in_registration_order() {
        let modules = build_modules(&BuiltinScenario::Baseline.scenario(), &BTreeMap::new(), 0).unwrap();
        let built: Vec<_> = modules.iter().map(|m| m.id()).collect();
        assert_eq!(built, ids::ALL.to_vec());
    }

    #[test]
    fn test_unknown_module_params_rejected() {
        let params = BTreeMap::from([("weather".to_string(), json!({ "rain": 1.0 }))]);
        let err = build_modules(&BuiltinScenario::Baseline.scenario(), &params, 0)
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::UnknownModule("weather".to_string()));
    }

    #[test]
    fn test_invalid_params_name_the_module() {
        let params = BTreeMap::from([("infra".to_string(), json!({ "rural_coverage": 2.0 }))]);
        let err = build_modules(&BuiltinScenario::Baseline.scenario(), &params, 0)
            .err()
            .unwrap();
        match err {
            ConfigError::InvalidModuleParams { module, .. } => assert_eq!(module, "infra"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
