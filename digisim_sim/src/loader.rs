//! Initial conditions from historical series.
//!
//! For every `(module, parameter)` series the latest observation at or
//! before the start year becomes the parameter's initial value. Values set
//! explicitly in the module parameters always win.

use crate::config::{HistoricalData, Observation};
use digisim_kernel::ConfigError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Merges historical series into per-module parameters.
pub struct DataLoader<'a> {
    historical: &'a HistoricalData,
    start_year: i32,
}

impl<'a> DataLoader<'a> {
    pub fn new(historical: &'a HistoricalData, start_year: i32) -> Self {
        Self {
            historical,
            start_year,
        }
    }

    /// Latest value observed at or before `year`, if any.
    pub fn latest_at_or_before(series: &[Observation], year: i32) -> Option<f64> {
        series
            .iter()
            .filter(|obs| obs.year <= year && obs.value.is_finite())
            .max_by_key(|obs| obs.year)
            .map(|obs| obs.value)
    }

    /// Initial values per module and parameter derived from the series.
    ///
    /// Series without a usable observation are left out.
    pub fn initial_conditions(&self) -> BTreeMap<String, BTreeMap<String, f64>> {
        self.historical
            .iter()
            .map(|(module, series)| {
                let values = series
                    .iter()
                    .filter_map(|(param, obs)| {
                        Self::latest_at_or_before(obs, self.start_year).map(|v| (param.clone(), v))
                    })
                    .collect::<BTreeMap<_, _>>();
                (module.clone(), values)
            })
            .filter(|(_, values)| !values.is_empty())
            .collect()
    }

    /// Returns `explicit` with historical initial values filled in.
    pub fn merge(&self, explicit: &BTreeMap<String, Value>) -> Result<BTreeMap<String, Value>, ConfigError> {
        let mut merged = explicit.clone();

        for (module, values) in self.initial_conditions() {
            let entry = merged.entry(module.clone()).or_insert(Value::Null);
            if entry.is_null() {
                *entry = Value::Object(Map::new());
            }
            let Some(params) = entry.as_object_mut() else {
                return Err(ConfigError::params(
                    &module,
                    "parameters must be an object to merge historical data",
                ));
            };

            for (param, value) in values {
                if params.contains_key(&param) {
                    debug!("{}.{}: explicit value overrides history", module, param);
                    continue;
                }
                debug!("{}.{} = {} (history up to {})", module, param, value, self.start_year);
                params.insert(param, json_number(value));
            }
        }

        Ok(merged)
    }
}

/// Whole numbers are written as integers so count parameters accept them.
fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obs(year: i32, value: f64) -> Observation {
        Observation { year, value }
    }

    fn history() -> HistoricalData {
        BTreeMap::from([(
            "infra".to_string(),
            BTreeMap::from([
                (
                    "broadband_penetration".to_string(),
                    vec![obs(2022, 0.25), obs(2024, 0.31), obs(2026, 0.4)],
                ),
                ("rural_coverage".to_string(), vec![obs(2027, 0.5)]),
            ]),
        )])
    }

    #[test]
    fn test_latest_observation_at_or_before_start() {
        let series = vec![obs(2024, 0.31), obs(2022, 0.25), obs(2026, 0.4)];
        assert_eq!(DataLoader::latest_at_or_before(&series, 2025), Some(0.31));
        assert_eq!(DataLoader::latest_at_or_before(&series, 2026), Some(0.4));
        assert_eq!(DataLoader::latest_at_or_before(&series, 2020), None);
        assert_eq!(DataLoader::latest_at_or_before(&[], 2025), None);
    }

    #[test]
    fn test_merge_fills_missing_params_only() {
        let history = history();
        let loader = DataLoader::new(&history, 2025);
        let explicit = BTreeMap::from([("gov".to_string(), json!({ "open_data_maturity": 0.4 }))]);

        let merged = loader.merge(&explicit).unwrap();

        assert_eq!(merged["infra"], json!({ "broadband_penetration": 0.31 }));
        assert_eq!(merged["gov"], json!({ "open_data_maturity": 0.4 }));
    }

    #[test]
    fn test_explicit_params_win() {
        let history = history();
        let loader = DataLoader::new(&history, 2025);
        let explicit = BTreeMap::from([("infra".to_string(), json!({ "broadband_penetration": 0.5 }))]);

        let merged = loader.merge(&explicit).unwrap();
        assert_eq!(merged["infra"]["broadband_penetration"], json!(0.5));
    }

    #[test]
    fn test_whole_numbers_stay_integers() {
        let history = BTreeMap::from([(
            "innovation".to_string(),
            BTreeMap::from([("active_tech_startups".to_string(), vec![obs(2024, 1500.0)])]),
        )]);
        let merged = DataLoader::new(&history, 2025).merge(&BTreeMap::new()).unwrap();
        assert_eq!(merged["innovation"]["active_tech_startups"], json!(1500));
    }

    #[test]
    fn test_non_object_params_rejected() {
        let history = history();
        let explicit = BTreeMap::from([("infra".to_string(), json!(3))]);
        assert!(DataLoader::new(&history, 2025).merge(&explicit).is_err());
    }
}
