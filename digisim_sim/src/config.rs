//! Run configuration.
//!
//! Everything a run needs is plain data: the horizon, the scenario name,
//! optional custom scenarios, per-module parameters, optional historical
//! series and the composite indicator list. Only the CLI touches the file
//! system; the library parses from strings.

use digisim_core::{Scenario, ScenarioCatalog};
use digisim_kernel::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_START_YEAR: i32 = 2025;
pub const DEFAULT_END_YEAR: i32 = 2035;
pub const DEFAULT_SCENARIO: &str = "baseline";

/// Longest accepted horizon, in years.
pub const MAX_HORIZON_YEARS: u32 = 10_000;

/// Inclusive range of simulated years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Horizon {
    pub start_year: i32,
    pub end_year: i32,
}

impl Horizon {
    /// Creates a horizon; `end_year` must not precede `start_year` and the
    /// span is capped at [`MAX_HORIZON_YEARS`].
    pub fn new(start_year: i32, end_year: i32) -> Result<Self, ConfigError> {
        if end_year < start_year {
            return Err(ConfigError::horizon(format!(
                "end_year {} is before start_year {}",
                end_year, start_year
            )));
        }
        let years = i64::from(end_year) - i64::from(start_year) + 1;
        if years > i64::from(MAX_HORIZON_YEARS) {
            return Err(ConfigError::horizon(format!(
                "{} years requested, at most {} allowed",
                years, MAX_HORIZON_YEARS
            )));
        }
        Ok(Self { start_year, end_year })
    }

    /// Creates a horizon covering `years` years starting at `start_year`.
    pub fn from_duration(start_year: i32, years: u32) -> Result<Self, ConfigError> {
        if years == 0 {
            return Err(ConfigError::horizon("duration_years must be at least 1"));
        }
        if years > MAX_HORIZON_YEARS {
            return Err(ConfigError::horizon(format!(
                "duration_years {} exceeds {}",
                years, MAX_HORIZON_YEARS
            )));
        }
        let span = i32::try_from(years - 1)
            .ok()
            .and_then(|span| start_year.checked_add(span))
            .ok_or_else(|| ConfigError::horizon(format!("duration_years {} is too large", years)))?;
        Self::new(start_year, span)
    }

    /// Number of simulated years.
    pub fn num_years(&self) -> usize {
        (i64::from(self.end_year) - i64::from(self.start_year) + 1) as usize
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
        }
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year)
    }
}

/// One historical data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub year: i32,
    pub value: f64,
}

/// Historical series keyed by module id, then by parameter name.
pub type HistoricalData = BTreeMap<String, BTreeMap<String, Vec<Observation>>>;

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// First simulated year
    pub start_year: i32,

    /// Last simulated year (inclusive)
    pub end_year: Option<i32>,

    /// Number of simulated years; must agree with `end_year` if both are set
    pub duration_years: Option<u32>,

    /// Scenario to run
    pub scenario: String,

    /// Master seed for the optional stochastic shocks
    pub seed: u64,

    /// Custom scenarios: name -> lever -> value
    pub scenarios: BTreeMap<String, BTreeMap<String, f64>>,

    /// Per-module initial parameters: module id -> JSON object
    pub modules: BTreeMap<String, Value>,

    /// Historical series used to derive initial conditions
    pub historical: HistoricalData,

    /// Composite index source keys (defaults to the built-in list)
    pub indicators: Option<Vec<String>>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            end_year: None,
            duration_years: None,
            scenario: DEFAULT_SCENARIO.to_string(),
            seed: 0,
            scenarios: BTreeMap::new(),
            modules: BTreeMap::new(),
            historical: HistoricalData::new(),
            indicators: None,
        }
    }
}

impl SimConfig {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the scenario name.
    pub fn with_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = scenario.into();
        self
    }

    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets an explicit horizon, clearing any duration.
    pub fn with_years(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = Some(end_year);
        self.duration_years = None;
        self
    }

    /// Resolves the horizon from `end_year` and/or `duration_years`.
    pub fn horizon(&self) -> Result<Horizon, ConfigError> {
        match (self.end_year, self.duration_years) {
            (None, None) => Horizon::new(self.start_year, DEFAULT_END_YEAR),
            (Some(end), None) => Horizon::new(self.start_year, end),
            (None, Some(years)) => Horizon::from_duration(self.start_year, years),
            (Some(end), Some(years)) => {
                let horizon = Horizon::from_duration(self.start_year, years)?;
                if horizon.end_year != end {
                    return Err(ConfigError::horizon(format!(
                        "end_year {} disagrees with duration_years {} (implies end_year {})",
                        end, years, horizon.end_year
                    )));
                }
                Ok(horizon)
            }
        }
    }

    /// Built-in scenarios extended with the configured custom ones.
    pub fn catalog(&self) -> Result<ScenarioCatalog, ConfigError> {
        self.scenarios
            .iter()
            .try_fold(ScenarioCatalog::builtin(), |catalog, (name, levers)| {
                catalog.with_custom(name.clone(), levers.clone())
            })
    }

    /// The selected scenario. Unknown names are an error.
    pub fn selected_scenario(&self) -> Result<Scenario, ConfigError> {
        self.catalog()?.select(&self.scenario)
    }
}

/// Failure to obtain a configuration document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON for the expected shape
    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoadError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
