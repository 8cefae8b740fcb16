//! The uniform step interface every sub-model implements.

use crate::inputs::ModuleInputs;
use crate::output::ModuleOutput;
use crate::schema::MetricSchema;
use crate::types::ModuleId;

/// A unit of private domain state advanced one simulated year at a time.
///
/// # Contract
///
/// - `step` is called once per year with strictly increasing `year`; the
///   first call is the configured start year.
/// - `inputs` holds exactly the producers declared for this module in the
///   dependency table. A LAGGED producer without a prior year arrives as an
///   empty mapping, so every read must go through a documented default
///   (see [`ModuleInputs::metric_or`]).
/// - The returned output is a fresh value carrying exactly the metrics in
///   [`SimModule::schema`].
/// - `step` never fails. Invalid configuration is rejected when the module
///   is constructed.
pub trait SimModule: Send {
    /// The module's id (also its snapshot namespace).
    fn id(&self) -> ModuleId;

    /// Metrics emitted every year.
    fn schema(&self) -> MetricSchema;

    /// Advances private state by one year and reports the new outputs.
    fn step(&mut self, year: i32, inputs: &ModuleInputs<'_>) -> ModuleOutput;
}
