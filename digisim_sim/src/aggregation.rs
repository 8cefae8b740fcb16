//! Normalized indicators and the composite maturity index.
//!
//! The engine is a pure function of a finalized [`ResultsHistory`]: it never
//! touches the history and may be run any number of times with the same
//! result. Degenerate inputs never fault:
//!
//! - constant series normalize to [`NEUTRAL`]
//! - a year without normalized values gets a composite of [`EMPTY_COMPOSITE`]
//! - missing source keys and non-finite values are skipped
//! - a derived column never overwrites an existing key
//!
//! Each case is reported through a [`DiagnosticSink`].

use crate::results::ResultsHistory;
use digisim_kernel::{Diagnostic, DiagnosticSink, MetricValue};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Column holding the composite index.
pub const COMPOSITE_KEY: &str = "composite_digital_maturity";

/// Suffix of normalized columns.
pub const NORM_SUFFIX: &str = "_norm";

/// Normalized value of a constant series.
pub const NEUTRAL: f64 = 0.5;

/// Composite value of a year without normalized values.
pub const EMPTY_COMPOSITE: f64 = 0.0;

/// Source keys of the composite index unless configured otherwise.
pub const DEFAULT_INDICATORS: [&str; 12] = [
    "policy_policy_effectiveness",
    "infra_broadband_penetration",
    "skills_skills_index",
    "inclusion_overall_literacy",
    "cyber_protection_level",
    "society_adoption_rate",
    "innovation_startup_count",
    "emerging_ai_adoption",
    "economy_digital_economy_share",
    "sectoral_fin_digital_index",
    "gov_e_service_coverage",
    "integration_it_exports",
];

/// Min-max normalizes a series.
///
/// Absent and non-finite entries stay `None`. If every finite value is the
/// same, each present year maps to [`NEUTRAL`].
pub fn normalize(series: &[Option<f64>]) -> Vec<Option<f64>> {
    let bounds = finite_bounds(series);

    series
        .iter()
        .map(|value| {
            let v = value.filter(|v| v.is_finite())?;
            let (min, max) = bounds?;
            if min == max {
                return Some(NEUTRAL);
            }
            let range = max - min;
            let scaled = if range.is_finite() {
                (v - min) / range
            } else {
                // max - min overflows; both halves stay finite
                (v / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
            };
            Some(scaled.clamp(0.0, 1.0))
        })
        .collect()
}

/// Smallest and largest finite value.
fn finite_bounds(series: &[Option<f64>]) -> Option<(f64, f64)> {
    series
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |bounds, v| match bounds {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
}

/// One year of the derived table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRow {
    pub year: i32,

    /// Raw snapshot values plus the derived columns
    #[serde(flatten)]
    pub values: BTreeMap<String, MetricValue>,
}

impl DerivedRow {
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).map(|v| v.as_f64())
    }

    /// Composite index of this year.
    pub fn composite(&self) -> f64 {
        self.get_f64(COMPOSITE_KEY).unwrap_or(EMPTY_COMPOSITE)
    }
}

/// First-to-last movement of one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub key: String,
    pub first_year: i32,
    pub last_year: i32,
    pub first: f64,
    pub last: f64,
    pub change: f64,

    /// Compound annual growth rate; `None` for a zero span or a
    /// non-positive starting value
    pub cagr: Option<f64>,
}

/// History plus normalized and composite columns.
///
/// Derived data only. It is not part of the simulation state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedTable {
    rows: Vec<DerivedRow>,

    /// Columns added by the engine
    derived_keys: BTreeSet<String>,
}

impl DerivedTable {
    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn year(&self, year: i32) -> Option<&DerivedRow> {
        self.rows.iter().find(|row| row.year == year)
    }

    pub fn last(&self) -> Option<&DerivedRow> {
        self.rows.last()
    }

    /// Columns added by normalization and the composite.
    pub fn derived_keys(&self) -> &BTreeSet<String> {
        &self.derived_keys
    }

    /// Composite index per year.
    pub fn composite(&self) -> Vec<(i32, f64)> {
        self.rows.iter().map(|row| (row.year, row.composite())).collect()
    }

    /// Final-year projection for reporting.
    ///
    /// With `exclude_derived` only the raw snapshot values are kept.
    pub fn summary(&self, exclude_derived: bool) -> BTreeMap<String, MetricValue> {
        let Some(last) = self.rows.last() else {
            return BTreeMap::new();
        };

        last.values
            .iter()
            .filter(|(key, _)| !(exclude_derived && self.derived_keys.contains(*key)))
            .map(|(key, value)| (key.clone(), *value))
            .collect()
    }

    /// Trend of every key present in the final year.
    pub fn trends(&self) -> Vec<Trend> {
        let Some(last) = self.rows.last() else {
            return Vec::new();
        };
        last.values.keys().filter_map(|key| self.trend(key)).collect()
    }

    /// Trend between the first and last finite values of `key`.
    pub fn trend(&self, key: &str) -> Option<Trend> {
        let mut points = self
            .rows
            .iter()
            .filter_map(|row| row.get_f64(key).filter(|v| v.is_finite()).map(|v| (row.year, v)));

        let (first_year, first) = points.next()?;
        let (last_year, last) = points.last().unwrap_or((first_year, first));
        let span = last_year - first_year;

        let cagr = (span > 0 && first > 0.0 && last >= 0.0).then(|| (last / first).powf(1.0 / span as f64) - 1.0);

        Some(Trend {
            key: key.to_string(),
            first_year,
            last_year,
            first,
            last,
            change: last - first,
            cagr,
        })
    }
}

/// Derives normalized indicators and the composite index.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    indicators: Vec<String>,
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregationEngine {
    /// Engine over [`DEFAULT_INDICATORS`].
    pub fn new() -> Self {
        Self {
            indicators: DEFAULT_INDICATORS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Replaces the source keys.
    pub fn with_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indicators = indicators.into_iter().map(Into::into).collect();
        self
    }

    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    /// Builds the derived table for `history`.
    pub fn derive(&self, history: &ResultsHistory, sink: &mut dyn DiagnosticSink) -> DerivedTable {
        let mut rows: Vec<DerivedRow> = history
            .iter()
            .map(|snapshot| DerivedRow {
                year: snapshot.year(),
                values: snapshot.values().clone(),
            })
            .collect();
        let mut normalized: Vec<Vec<f64>> = vec![Vec::new(); rows.len()];
        let mut derived_keys = BTreeSet::new();
        let available = history.keys();

        for key in &self.indicators {
            if !available.contains(key.as_str()) {
                sink.record(Diagnostic::MissingSourceColumn { key: key.clone() });
                continue;
            }

            let column = format!("{}{}", key, NORM_SUFFIX);
            if available.contains(column.as_str()) || derived_keys.contains(&column) {
                sink.record(Diagnostic::DerivedKeyCollision {
                    source: key.clone(),
                    column,
                });
                continue;
            }

            let series = history.series(key);
            for (row, value) in rows.iter().zip(&series) {
                if value.is_some_and(|v| !v.is_finite()) {
                    sink.record(Diagnostic::NonFiniteValue {
                        year: row.year,
                        key: key.clone(),
                    });
                }
            }
            if let Some((min, max)) = finite_bounds(&series) {
                if min == max {
                    sink.record(Diagnostic::ConstantSeries {
                        key: key.clone(),
                        value: min,
                    });
                }
            }

            for ((row, acc), value) in rows.iter_mut().zip(&mut normalized).zip(normalize(&series)) {
                if let Some(v) = value {
                    row.values.insert(column.clone(), MetricValue::Float(v));
                    acc.push(v);
                }
            }
            derived_keys.insert(column);
        }

        for (row, values) in rows.iter_mut().zip(&normalized) {
            let composite = if values.is_empty() {
                sink.record(Diagnostic::EmptyComposite { year: row.year });
                EMPTY_COMPOSITE
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            };
            row.values.insert(COMPOSITE_KEY.to_string(), MetricValue::Float(composite));
        }
        derived_keys.insert(COMPOSITE_KEY.to_string());

        debug!(
            "Derived {} rows, {} normalized columns",
            rows.len(),
            derived_keys.len() - 1
        );
        DerivedTable { rows, derived_keys }
    }
}
