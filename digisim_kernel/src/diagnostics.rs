//! Structured diagnostics emitted by the orchestrator and the aggregation
//! engine.
//!
//! Diagnostics describe conditions that were recovered locally with a
//! documented default. They never abort a run. Each one is delivered to a
//! [`DiagnosticSink`] and mirrored as a `tracing` event.

use crate::types::ModuleId;
use serde::Serialize;
use tracing::{debug, warn};

/// How loudly a diagnostic should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Expected fallback (e.g. start-year LAGGED read)
    Debug,

    /// Data was missing or degenerate
    Warning,
}

/// A non-fatal event recorded during a run or during aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A module read a metric its dependency did not provide
    MissingInput {
        year: i32,
        consumer: ModuleId,
        producer: ModuleId,
        metric: String,
        default: f64,
        initial: bool,
    },

    /// A normalization source key does not appear in any snapshot
    MissingSourceColumn { key: String },

    /// A normalization source never changes; every year maps to 0.5
    ConstantSeries { key: String, value: f64 },

    /// No normalized metric was available for a year; composite is 0.0
    EmptyComposite { year: i32 },

    /// A NaN or infinite value was skipped during aggregation
    NonFiniteValue { year: i32, key: String },

    /// A derived column name is already taken; the source is not normalized
    DerivedKeyCollision { source: String, column: String },
}

impl Diagnostic {
    /// Returns the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::MissingInput { initial: true, .. } => Severity::Debug,
            Diagnostic::ConstantSeries { .. } => Severity::Debug,
            _ => Severity::Warning,
        }
    }

    /// Mirrors the diagnostic as a `tracing` event.
    pub fn emit(&self) {
        match self.severity() {
            Severity::Debug => debug!("{}", self),
            Severity::Warning => warn!("{}", self),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::MissingInput {
                year,
                consumer,
                producer,
                metric,
                default,
                initial,
            } => {
                write!(
                    f,
                    "[{}] {} read {}.{}: absent, using default {}",
                    year, consumer, producer, metric, default
                )?;
                if *initial {
                    write!(f, " (no prior year)")?;
                }
                Ok(())
            }
            Diagnostic::MissingSourceColumn { key } => {
                write!(f, "normalization source '{}' not found in results", key)
            }
            Diagnostic::ConstantSeries { key, value } => {
                write!(f, "'{}' is constant ({}), normalized to 0.5", key, value)
            }
            Diagnostic::EmptyComposite { year } => {
                write!(f, "[{}] no normalized metrics available, composite set to 0.0", year)
            }
            Diagnostic::NonFiniteValue { year, key } => {
                write!(f, "[{}] non-finite value for '{}' skipped", year, key)
            }
            Diagnostic::DerivedKeyCollision { source, column } => {
                write!(f, "'{}' already exists, '{}' not normalized", column, source)
            }
        }
    }
}

/// Receiver for diagnostics (an external observability collaborator).
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn record(&mut self, diagnostic: Diagnostic);
}

/// In-memory diagnostic collector.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded diagnostics, in recording order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Diagnostics at warning severity.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the log.
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn record(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.entries.push(diagnostic);
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn record(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_misses_are_debug() {
        let d = Diagnostic::MissingInput {
            year: 2025,
            consumer: ModuleId::from_static("skills"),
            producer: ModuleId::from_static("economy"),
            metric: "gdp_growth".to_string(),
            default: 0.06,
            initial: true,
        };
        assert_eq!(d.severity(), Severity::Debug);
        assert!(d.to_string().contains("no prior year"));
    }

    #[test]
    fn test_log_collects_and_filters() {
        let mut log = DiagnosticLog::new();
        log.record(Diagnostic::ConstantSeries {
            key: "policy_sandbox_scope".to_string(),
            value: 0.5,
        });
        log.record(Diagnostic::EmptyComposite { year: 2030 });

        assert_eq!(log.len(), 2);
        assert_eq!(log.warnings().count(), 1);
    }

    #[test]
    fn test_diagnostic_serializes_with_kind_tag() {
        let json = serde_json::to_value(Diagnostic::EmptyComposite { year: 2026 }).unwrap();
        assert_eq!(json["kind"], "empty_composite");
        assert_eq!(json["year"], 2026);
    }

    #[test]
    fn test_collision_is_a_warning() {
        let d = Diagnostic::DerivedKeyCollision {
            source: "innovation_rd_investment".to_string(),
            column: "innovation_rd_investment_norm".to_string(),
        };
        assert_eq!(d.severity(), Severity::Warning);
        assert!(d.to_string().contains("innovation_rd_investment_norm"));
    }
}
