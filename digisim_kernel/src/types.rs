//! Common types for the simulation module contract.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Unique identifier for a simulation module.
///
/// The id doubles as the namespace prefix of the module's metrics once a
/// year is sealed (`"{module_id}_{metric}"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(Cow<'static, str>);

impl ModuleId {
    /// Creates an id from a static string (usable in `const` items).
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Creates an id from an owned string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&'static str> for ModuleId {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

/// Builds the snapshot key for a module metric.
pub fn namespaced_key(module: &ModuleId, metric: &str) -> String {
    format!("{}_{}", module.as_str(), metric)
}

/// A single scalar metric value.
///
/// Most metrics are real-valued; a few are integer counts (startups,
/// pilots). Both serialize as plain JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Integer count
    Count(i64),

    /// Real-valued measurement
    Float(f64),
}

impl MetricValue {
    /// Returns the value as `f64` (counts are widened).
    pub fn as_f64(&self) -> f64 {
        match *self {
            MetricValue::Count(n) => n as f64,
            MetricValue::Float(v) => v,
        }
    }

    /// Returns true unless the value is a NaN or infinite float.
    pub fn is_finite(&self) -> bool {
        match *self {
            MetricValue::Count(_) => true,
            MetricValue::Float(v) => v.is_finite(),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

impl From<i64> for MetricValue {
    fn from(n: i64) -> Self {
        MetricValue::Count(n)
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Float(v) => write!(f, "{:.4}", v),
        }
    }
}

/// Temporal kind of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Producer must already have run this year.
    Current,

    /// Consumer reads the producer's previous sealed year
    /// (empty mapping in the start year).
    Lagged,
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DependencyKind::Current => write!(f, "current"),
            DependencyKind::Lagged => write!(f, "lagged"),
        }
    }
}

/// One declared dependency: `consumer` reads `producer`'s output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Module reading the output
    pub consumer: ModuleId,

    /// Module whose output is read
    pub producer: ModuleId,

    /// Same-year or previous-year read
    pub kind: DependencyKind,

    /// Modeling assumption behind the edge (mandatory for LAGGED edges)
    pub rationale: Cow<'static, str>,
}

impl DependencyEdge {
    /// Declares a same-year dependency.
    pub fn current(consumer: impl Into<ModuleId>, producer: impl Into<ModuleId>) -> Self {
        Self {
            consumer: consumer.into(),
            producer: producer.into(),
            kind: DependencyKind::Current,
            rationale: Cow::Borrowed(""),
        }
    }

    /// Declares a previous-year dependency together with the reason the
    /// cycle is broken here.
    pub fn lagged(
        consumer: impl Into<ModuleId>,
        producer: impl Into<ModuleId>,
        rationale: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            consumer: consumer.into(),
            producer: producer.into(),
            kind: DependencyKind::Lagged,
            rationale: rationale.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_id_static_and_owned_compare_equal() {
        const POLICY: ModuleId = ModuleId::from_static("policy");
        assert_eq!(POLICY, ModuleId::new("policy"));
        assert_eq!(POLICY.to_string(), "policy");
    }

    #[test]
    fn test_namespaced_key() {
        let id = ModuleId::from_static("infra");
        assert_eq!(namespaced_key(&id, "rural_coverage"), "infra_rural_coverage");
    }

    #[test]
    fn test_metric_value_serializes_as_plain_number() {
        let count = serde_json::to_string(&MetricValue::Count(1200)).unwrap();
        let float = serde_json::to_string(&MetricValue::Float(0.25)).unwrap();
        assert_eq!(count, "1200");
        assert_eq!(float, "0.25");

        let back: MetricValue = serde_json::from_str("7").unwrap();
        assert_eq!(back, MetricValue::Count(7));
        let back: MetricValue = serde_json::from_str("0.5").unwrap();
        assert_eq!(back, MetricValue::Float(0.5));
    }

    #[test]
    fn test_metric_value_finiteness() {
        assert!(MetricValue::Count(i64::MAX).is_finite());
        assert!(!MetricValue::Float(f64::NAN).is_finite());
        assert_eq!(MetricValue::Count(3).as_f64(), 3.0);
    }

    #[test]
    fn test_edge_constructors() {
        let edge = DependencyEdge::lagged("skills", "economy", "demand lags training");
        assert_eq!(edge.kind, DependencyKind::Lagged);
        assert_eq!(edge.consumer.as_str(), "skills");
        assert!(!edge.rationale.is_empty());

        let edge = DependencyEdge::current("society", "cyber");
        assert_eq!(edge.kind, DependencyKind::Current);
        assert!(edge.rationale.is_empty());
    }
}
