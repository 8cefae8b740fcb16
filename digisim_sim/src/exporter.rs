//! JSON exporter for the report generator.
//!
//! Bundles one run (and optionally a comparison) into a single document.
//! Writing the document out is left to the caller.

use crate::aggregation::{DerivedRow, Trend};
use crate::comparison::ScenarioComparison;
use crate::config::Horizon;
use crate::results::ResultsHistory;
use crate::runner::RunReport;
use digisim_kernel::{Diagnostic, ModuleId};
use serde::Serialize;

/// Complete simulation export.
#[derive(Debug, Clone, Serialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    pub horizon: Horizon,

    /// Module ids in execution order
    pub execution_order: Vec<ModuleId>,

    /// One flat row per simulated year
    pub history: ResultsHistory,

    /// History rows plus normalized and composite columns
    pub derived: Vec<DerivedRow>,

    /// First-to-last movement of every final-year key
    pub trends: Vec<Trend>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ScenarioComparison>,
}

impl SimExport {
    /// Creates an export from a finished run.
    pub fn from_report(report: &RunReport) -> Self {
        Self {
            scenario: report.label.clone(),
            seed: report.seed,
            horizon: report.horizon,
            execution_order: report.execution_order.clone(),
            history: report.history.clone(),
            derived: report.derived.rows().to_vec(),
            trends: report.derived.trends(),
            diagnostics: report.diagnostics.clone(),
            comparison: None,
        }
    }

    /// Attaches a scenario comparison.
    pub fn with_comparison(mut self, comparison: ScenarioComparison) -> Self {
        self.comparison = Some(comparison);
        self
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
