//! Immutable per-year module outputs.

use crate::types::MetricValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The metrics a module exposes for one year.
///
/// Built fresh by every `step` call and never mutated afterwards; the only
/// way to change the contents is to take ownership of the underlying map
/// with [`ModuleOutput::into_inner`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleOutput {
    metrics: BTreeMap<String, MetricValue>,
}

pub(crate) static EMPTY_OUTPUT: ModuleOutput = ModuleOutput {
    metrics: BTreeMap::new(),
};

impl ModuleOutput {
    /// Starts building an output.
    pub fn builder() -> OutputBuilder {
        OutputBuilder::default()
    }

    /// An output without any metrics (start-year stand-in for LAGGED reads).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up a metric.
    pub fn get(&self, metric: &str) -> Option<MetricValue> {
        self.metrics.get(metric).copied()
    }

    /// Looks up a metric as `f64`.
    pub fn get_f64(&self, metric: &str) -> Option<f64> {
        self.get(metric).map(|v| v.as_f64())
    }

    /// Iterates metrics in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, MetricValue)> {
        self.metrics.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Metric names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(|k| k.as_str())
    }

    /// Number of metrics.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// True when no metric is present.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Hands the metrics over to the caller.
    pub fn into_inner(self) -> BTreeMap<String, MetricValue> {
        self.metrics
    }
}

impl<K: Into<String>, V: Into<MetricValue>> FromIterator<(K, V)> for ModuleOutput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            metrics: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Builder for [`ModuleOutput`].
#[derive(Debug, Default)]
pub struct OutputBuilder {
    metrics: BTreeMap<String, MetricValue>,
}

impl OutputBuilder {
    /// Adds a real-valued metric.
    pub fn float(mut self, metric: &str, value: f64) -> Self {
        self.metrics.insert(metric.to_string(), MetricValue::Float(value));
        self
    }

    /// Adds an integer count.
    pub fn count(mut self, metric: &str, value: i64) -> Self {
        self.metrics.insert(metric.to_string(), MetricValue::Count(value));
        self
    }

    /// Seals the output.
    pub fn build(self) -> ModuleOutput {
        ModuleOutput {
            metrics: self.metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let out = ModuleOutput::builder()
            .float("adoption_rate", 0.61)
            .count("startup_count", 1260)
            .build();

        assert_eq!(out.len(), 2);
        assert_eq!(out.get("adoption_rate"), Some(MetricValue::Float(0.61)));
        assert_eq!(out.get_f64("startup_count"), Some(1260.0));
        assert_eq!(out.get("missing"), None);
        assert_eq!(out.names().collect::<Vec<_>>(), vec!["adoption_rate", "startup_count"]);
    }

    #[test]
    fn test_clone_has_value_semantics() {
        let out = ModuleOutput::builder().float("x", 1.0).build();
        let mut owned = out.clone().into_inner();
        owned.insert("x".to_string(), MetricValue::Float(99.0));

        // The original is unaffected by changes to the caller's copy
        assert_eq!(out.get_f64("x"), Some(1.0));
    }

    #[test]
    fn test_from_iter() {
        let out: ModuleOutput = vec![("a", 1.0), ("b", 2.0)].into_iter().collect();
        assert_eq!(out.get_f64("b"), Some(2.0));
        assert!(EMPTY_OUTPUT.is_empty());
    }
}
