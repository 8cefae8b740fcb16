//! Final-year comparison of two scenario runs.

use crate::aggregation::{DerivedTable, COMPOSITE_KEY};
use serde::Serialize;
use std::collections::BTreeSet;

/// One key compared across two runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub key: String,
    pub baseline: Option<f64>,
    pub alternative: Option<f64>,

    /// `alternative - baseline` when both sides have the key
    pub delta: Option<f64>,
}

/// Side-by-side final-year values of two derived tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioComparison {
    pub baseline: String,
    pub alternative: String,
    pub rows: Vec<ComparisonRow>,
}

impl ScenarioComparison {
    pub fn row(&self, key: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| row.key == key)
    }

    /// Composite index difference, if both runs have one.
    pub fn composite_delta(&self) -> Option<f64> {
        self.row(COMPOSITE_KEY)?.delta
    }

    /// Rows with a delta, largest absolute change first.
    pub fn largest_changes(&self, n: usize) -> Vec<&ComparisonRow> {
        let mut rows: Vec<_> = self.rows.iter().filter(|row| row.delta.is_some()).collect();
        rows.sort_by(|a, b| {
            let a = a.delta.map_or(0.0, f64::abs);
            let b = b.delta.map_or(0.0, f64::abs);
            b.total_cmp(&a)
        });
        rows.truncate(n);
        rows
    }
}

/// Compares the final years of two derived tables over the union of keys.
pub fn compare(
    baseline_label: &str,
    baseline: &DerivedTable,
    alternative_label: &str,
    alternative: &DerivedTable,
) -> ScenarioComparison {
    let base_last = baseline.last();
    let alt_last = alternative.last();

    let keys: BTreeSet<&String> = base_last
        .into_iter()
        .chain(alt_last)
        .flat_map(|row| row.values.keys())
        .collect();

    let rows = keys
        .into_iter()
        .map(|key| {
            let base = base_last.and_then(|row| row.get_f64(key));
            let alt = alt_last.and_then(|row| row.get_f64(key));
            ComparisonRow {
                key: key.clone(),
                baseline: base,
                alternative: alt,
                delta: base.zip(alt).map(|(b, a)| a - b),
            }
        })
        .collect();

    ScenarioComparison {
        baseline: baseline_label.to_string(),
        alternative: alternative_label.to_string(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::AggregationEngine;
    use crate::results::tests::history_of;
    use approx::assert_relative_eq;

    fn table(rows: Vec<(i32, Vec<(&'static str, &'static str, f64)>)>) -> DerivedTable {
        AggregationEngine::new()
            .with_indicators(["a_x"])
            .derive(&history_of(rows), &mut Vec::new())
    }

    #[test]
    fn test_compare_final_year_union() {
        let base = table(vec![
            (2025, vec![("a", "x", 1.0), ("b", "y", 5.0)]),
            (2026, vec![("a", "x", 2.0), ("b", "y", 6.0)]),
        ]);
        let alt = table(vec![
            (2025, vec![("a", "x", 1.0), ("c", "z", 9.0)]),
            (2026, vec![("a", "x", 3.5), ("c", "z", 8.0)]),
        ]);

        let cmp = compare("baseline", &base, "pro_investment", &alt);

        let keys: Vec<_> = cmp.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a_x", "a_x_norm", "b_y", "c_z", COMPOSITE_KEY]);

        let a = cmp.row("a_x").unwrap();
        assert_relative_eq!(a.delta.unwrap(), 1.5, epsilon = 1e-12);

        let b = cmp.row("b_y").unwrap();
        assert_eq!((b.baseline, b.alternative, b.delta), (Some(6.0), None, None));

        assert_eq!(cmp.composite_delta(), Some(0.0));
        assert_eq!(cmp.largest_changes(1)[0].key, "a_x");
    }

    #[test]
    fn test_compare_empty_tables() {
        let cmp = compare("a", &DerivedTable::default(), "b", &DerivedTable::default());
        assert!(cmp.rows.is_empty());
        assert!(cmp.composite_delta().is_none());
    }

    #[test]
    fn test_builtin_scenarios_diverge() {
        use crate::config::SimConfig;
        use crate::orchestrator::Simulation;

        let derive = |scenario: &str| {
            let mut sim = Simulation::new(&SimConfig::default().with_scenario(scenario)).unwrap();
            let history = sim.run().unwrap().clone();
            AggregationEngine::new().derive(&history, &mut Vec::new())
        };

        let cmp = compare("baseline", &derive("baseline"), "pro_investment", &derive("pro_investment"));
        let incentive = cmp.row("policy_investment_incentive").unwrap();
        assert!(incentive.delta.unwrap() > 0.0);
    }
}
