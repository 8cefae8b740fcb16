//! digisim Kernel - the module contract
//!
//! This crate defines the seam between the simulation orchestrator and the
//! domain sub-models. Everything a module needs to participate in a run
//! lives here, and nothing else:
//!
//! - **Identity**: [`ModuleId`] names a module and namespaces its metrics
//! - **Schema**: [`MetricSchema`] declares the stable set of metrics a module emits
//! - **Data**: [`ModuleOutput`] (immutable, produced fresh every year) and
//!   [`ModuleInputs`] (resolved upstream outputs for one step)
//! - **Wiring**: [`DependencyEdge`] with its [`DependencyKind`] (CURRENT or LAGGED)
//! - **Observability**: [`Diagnostic`] events delivered to a [`DiagnosticSink`]
//!
//! # Example
//!
//! ```ignore
//! use digisim_kernel::{MetricSchema, ModuleId, ModuleInputs, ModuleOutput, SimModule};
//!
//! struct Counter { id: ModuleId }
//!
//! impl SimModule for Counter {
//!     fn id(&self) -> ModuleId { self.id.clone() }
//!     fn schema(&self) -> MetricSchema { MetricSchema::new(&["x"]) }
//!     fn step(&mut self, year: i32, _inputs: &ModuleInputs<'_>) -> ModuleOutput {
//!         ModuleOutput::builder().count("x", year as i64).build()
//!     }
//! }
//! ```

mod diagnostics;
mod error;
mod inputs;
mod module;
mod output;
mod schema;
mod types;

pub use diagnostics::{Diagnostic, DiagnosticLog, DiagnosticSink, Severity};
pub use error::{ConfigError, SimError};
pub use inputs::{MissingInput, ModuleInputs, Resolution};
pub use module::SimModule;
pub use output::{ModuleOutput, OutputBuilder};
pub use schema::MetricSchema;
pub use types::{namespaced_key, DependencyEdge, DependencyKind, MetricValue, ModuleId};
