//! International integration: IT exports, cross-border capacity and
//! digital trade.

use crate::ids::{ECONOMY, INFRA, INTEGRATION, POLICY};
use crate::params::{self, ModuleParams};
use digisim_kernel::{ConfigError, MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
use serde::Deserialize;

pub const METRICS: MetricSchema =
    MetricSchema::new(&["it_exports", "int_connectivity", "digital_trade_volume"]);

/// Bandwidth (Tbps) that counts as a unit connectivity factor.
const BANDWIDTH_SCALE: f64 = 50.0;

/// Initial integration state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrationParams {
    /// IT/BPO exports (USD billions)
    pub it_exports: f64,

    /// Submarine cable capacity (Tbps)
    pub submarine_cable_capacity: f64,

    /// Cross-border e-commerce volume (USD millions)
    pub cross_border_ecommerce: f64,
}

impl Default for IntegrationParams {
    fn default() -> Self {
        Self {
            it_exports: 1.5,
            submarine_cable_capacity: 10.0,
            cross_border_ecommerce: 300.0,
        }
    }
}

impl ModuleParams for IntegrationParams {
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        params::non_negative(module, "it_exports", self.it_exports)?;
        params::non_negative(module, "submarine_cable_capacity", self.submarine_cable_capacity)?;
        params::non_negative(module, "cross_border_ecommerce", self.cross_border_ecommerce)
    }
}

pub struct InternationalIntegration {
    state: IntegrationParams,
}

impl InternationalIntegration {
    pub fn new(state: IntegrationParams) -> Self {
        Self { state }
    }
}

impl SimModule for InternationalIntegration {
    fn id(&self) -> ModuleId {
        INTEGRATION
    }

    fn schema(&self) -> MetricSchema {
        METRICS
    }

    fn step(&mut self, _year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput {
        let bandwidth = inputs.metric_or(&INFRA, "international_bandwidth", 10.0) / BANDWIDTH_SCALE;
        let competitiveness = inputs.metric_or(&ECONOMY, "overall_competitiveness", 0.5);
        let trade_focus = inputs.metric_or(&POLICY, "trade_agreement_focus", 0.4);
        let s = &mut self.state;

        s.it_exports *= 1.08 + 0.1 * competitiveness + 0.05 * trade_focus;
        s.submarine_cable_capacity += 2.0 * bandwidth;
        s.cross_border_ecommerce *= 1.1 + 0.1 * competitiveness * trade_focus;

        ModuleOutput::builder()
            .float("it_exports", s.it_exports)
            .float("int_connectivity", s.submarine_cable_capacity)
            .float("digital_trade_volume", s.cross_border_ecommerce)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use digisim_kernel::Resolution;

    #[test]
    fn test_integration_defaults() {
        let out = InternationalIntegration::new(IntegrationParams::default()).step(2025, &ModuleInputs::new());

        assert_relative_eq!(out.get_f64("it_exports").unwrap(), 1.5 * 1.15, epsilon = 1e-12);
        assert_relative_eq!(out.get_f64("int_connectivity").unwrap(), 10.4, epsilon = 1e-12);
        assert_relative_eq!(out.get_f64("digital_trade_volume").unwrap(), 300.0 * 1.12, epsilon = 1e-9);
    }

    #[test]
    fn test_bandwidth_drives_connectivity() {
        let infra: ModuleOutput = [("international_bandwidth", 100.0)].into_iter().collect();
        let mut inputs = ModuleInputs::new();
        inputs.insert(INFRA, &infra, Resolution::Current);

        let out = InternationalIntegration::new(IntegrationParams::default()).step(2025, &inputs);
        assert_relative_eq!(out.get_f64("int_connectivity").unwrap(), 14.0, epsilon = 1e-12);
    }
}
