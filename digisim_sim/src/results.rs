//! Time-indexed results store.
//!
//! One [`YearSnapshot`] is sealed per simulated year and appended to the
//! [`ResultsHistory`]. Snapshots are never modified after sealing; the only
//! writer is the orchestrator.

use digisim_kernel::{namespaced_key, MetricValue, ModuleId, ModuleOutput};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// All module outputs of one year, flattened to `"{module}_{metric}"` keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSnapshot {
    year: i32,

    #[serde(flatten)]
    values: BTreeMap<String, MetricValue>,

    /// Per-module view, used to resolve LAGGED reads in the next year
    #[serde(skip)]
    outputs: BTreeMap<ModuleId, ModuleOutput>,
}

impl YearSnapshot {
    /// Namespaces and seals the outputs of one year.
    pub(crate) fn seal(year: i32, outputs: BTreeMap<ModuleId, ModuleOutput>) -> Self {
        let values = outputs
            .iter()
            .flat_map(|(id, output)| output.iter().map(move |(metric, v)| (namespaced_key(id, metric), v)))
            .collect();

        Self { year, values, outputs }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Looks up a namespaced value.
    pub fn get(&self, key: &str) -> Option<MetricValue> {
        self.values.get(key).copied()
    }

    /// Looks up a namespaced value as `f64`.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).map(|v| v.as_f64())
    }

    /// Flat `key -> value` mapping, in key order.
    pub fn values(&self) -> &BTreeMap<String, MetricValue> {
        &self.values
    }

    /// Output of one module in this year.
    pub fn output(&self, module: &ModuleId) -> Option<&ModuleOutput> {
        self.outputs.get(module)
    }

    /// Number of namespaced values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered sequence of sealed snapshots; insertion order is year order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultsHistory {
    snapshots: Vec<YearSnapshot>,
}

impl ResultsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next year. Years must be consecutive.
    pub(crate) fn push(&mut self, snapshot: YearSnapshot) {
        debug_assert!(
            self.last().map_or(true, |last| last.year + 1 == snapshot.year),
            "snapshots must be appended in consecutive year order"
        );
        self.snapshots.push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshots in year order.
    pub fn iter(&self) -> std::slice::Iter<'_, YearSnapshot> {
        self.snapshots.iter()
    }

    pub fn first(&self) -> Option<&YearSnapshot> {
        self.snapshots.first()
    }

    pub fn last(&self) -> Option<&YearSnapshot> {
        self.snapshots.last()
    }

    /// Snapshot for `year`, if simulated.
    pub fn year(&self, year: i32) -> Option<&YearSnapshot> {
        let first = self.first()?.year;
        let offset = usize::try_from(year.checked_sub(first)?).ok()?;
        self.snapshots.get(offset)
    }

    /// Simulated years in order.
    pub fn years(&self) -> Vec<i32> {
        self.snapshots.iter().map(|s| s.year).collect()
    }

    /// Every key that appears in at least one snapshot.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.snapshots
            .iter()
            .flat_map(|s| s.values.keys().map(|k| k.as_str()))
            .collect()
    }

    /// One key across all years (`None` where the key is absent).
    pub fn series(&self, key: &str) -> Vec<Option<f64>> {
        self.snapshots.iter().map(|s| s.get_f64(key)).collect()
    }
}

impl<'a> IntoIterator for &'a ResultsHistory {
    type Item = &'a YearSnapshot;
    type IntoIter = std::slice::Iter<'a, YearSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a history from `(year, [(module, metric, value)])` rows.
    pub(crate) fn history_of(rows: Vec<(i32, Vec<(&'static str, &'static str, f64)>)>) -> ResultsHistory {
        let mut history = ResultsHistory::new();
        for (year, values) in rows {
            let mut outputs: BTreeMap<ModuleId, ModuleOutput> = BTreeMap::new();
            for (module, metric, value) in values {
                let existing = outputs.remove(&ModuleId::from_static(module)).unwrap_or_default();
                let merged = existing
                    .into_inner()
                    .into_iter()
                    .chain([(metric.to_string(), MetricValue::Float(value))])
                    .collect();
                outputs.insert(ModuleId::from_static(module), merged);
            }
            history.push(YearSnapshot::seal(year, outputs));
        }
        history
    }

    #[test]
    fn test_seal_namespaces_keys() {
        let history = history_of(vec![(
            2025,
            vec![("infra", "rural_coverage", 0.2), ("gov", "open_data_maturity", 0.3)],
        )]);
        let snapshot = history.year(2025).unwrap();

        assert_eq!(snapshot.get_f64("infra_rural_coverage"), Some(0.2));
        assert_eq!(snapshot.get_f64("gov_open_data_maturity"), Some(0.3));
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.output(&ModuleId::from_static("infra")).is_some());
    }

    #[test]
    fn test_year_lookup_and_series() {
        let history = history_of(vec![
            (2025, vec![("a", "x", 1.0)]),
            (2026, vec![("a", "x", 2.0)]),
            (2027, vec![("b", "y", 3.0)]),
        ]);

        assert_eq!(history.years(), vec![2025, 2026, 2027]);
        assert_eq!(history.year(2026).unwrap().year(), 2026);
        assert!(history.year(2024).is_none());
        assert!(history.year(2028).is_none());
        assert_eq!(history.series("a_x"), vec![Some(1.0), Some(2.0), None]);
        assert_eq!(history.keys().into_iter().collect::<Vec<_>>(), vec!["a_x", "b_y"]);
    }

    #[test]
    fn test_snapshot_serializes_flat() {
        let history = history_of(vec![(2025, vec![("a", "x", 1.5)])]);
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json, serde_json::json!([{ "year": 2025, "a_x": 1.5 }]));
    }
}
