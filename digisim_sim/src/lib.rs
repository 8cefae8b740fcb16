//! digisim simulation harness
//!
//! Advances the twelve digital-transformation sub-models one simulated year
//! at a time, collects their outputs into a time-indexed results store and
//! derives normalized indicators plus a composite maturity index.
//!
//! # Core Principle: Deterministic Year Loop
//!
//! - **Order**: modules run in a topological order over CURRENT dependencies,
//!   ties broken by registration order
//! - **Lag**: LAGGED dependencies read the previous sealed year, which is how
//!   domain feedback cycles are broken
//! - **Randomness**: optional shocks are derived from a single 64-bit seed
//!
//! # Architecture
//!
//! ```text
//! SimConfig ──► DataLoader ──► build_modules ──► Simulation
//!                                                   │  per year:
//!                                                   │  resolve inputs → step → seal
//!                                                   ▼
//!                                             ResultsHistory
//!                                                   │
//!                                                   ▼
//!                                          AggregationEngine ──► DerivedTable
//!                                                                   │
//!                                                    compare / SimExport
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use digisim_sim::{ScenarioRunner, SimConfig};
//!
//! let config = SimConfig::default().with_scenario("pro_investment").with_seed(42);
//! let report = ScenarioRunner::new(config).run()?;
//! println!("{:?}", report.final_composite());
//! ```

pub mod aggregation;
pub mod comparison;
pub mod config;
mod exporter;
pub mod graph;
mod loader;
pub mod orchestrator;
pub mod results;
mod runner;

pub use aggregation::{AggregationEngine, DerivedRow, DerivedTable, Trend, COMPOSITE_KEY, DEFAULT_INDICATORS};
pub use comparison::{compare, ComparisonRow, ScenarioComparison};
pub use config::{Horizon, HistoricalData, LoadError, Observation, SimConfig};
pub use exporter::SimExport;
pub use graph::DependencyGraph;
pub use loader::DataLoader;
pub use orchestrator::Simulation;
pub use results::{ResultsHistory, YearSnapshot};
pub use runner::{RunReport, ScenarioRunner};
