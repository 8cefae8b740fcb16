//! Resolved inputs handed to a module's `step`.

use crate::output::{ModuleOutput, EMPTY_OUTPUT};
use crate::types::ModuleId;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// How a dependency's output was obtained for this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Producer already ran this year
    Current,

    /// Read from the previous sealed snapshot
    Lagged,

    /// LAGGED read in the start year: no prior snapshot, empty mapping
    Initial,
}

/// A metric lookup that fell back to its documented default.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingInput {
    /// Module whose output lacked the metric
    pub producer: ModuleId,

    /// Metric that was requested
    pub metric: String,

    /// Default substituted by the consumer
    pub default: f64,

    /// True when the miss comes from the start-year empty LAGGED mapping
    pub initial: bool,
}

/// Upstream outputs for one module in one year.
///
/// Contains exactly the producers declared as the consumer's dependencies.
/// Lookups that fall back to a default are remembered so the orchestrator
/// can turn them into diagnostics after the step.
pub struct ModuleInputs<'a> {
    entries: BTreeMap<ModuleId, (&'a ModuleOutput, Resolution)>,
    misses: RefCell<Vec<MissingInput>>,
}

impl<'a> ModuleInputs<'a> {
    /// Creates an empty input set.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            misses: RefCell::new(Vec::new()),
        }
    }

    /// Registers a resolved dependency.
    pub fn insert(&mut self, producer: ModuleId, output: &'a ModuleOutput, resolution: Resolution) {
        self.entries.insert(producer, (output, resolution));
    }

    /// Registers a dependency with no prior output (empty mapping).
    pub fn insert_initial(&mut self, producer: ModuleId) {
        self.entries.insert(producer, (&EMPTY_OUTPUT, Resolution::Initial));
    }

    /// Output of a declared producer.
    pub fn output(&self, producer: &ModuleId) -> Option<&'a ModuleOutput> {
        self.entries.get(producer).map(|(out, _)| *out)
    }

    /// Number of declared producers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the consumer has no dependencies.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads `producer.metric`, substituting `default` when it is absent.
    ///
    /// A substitution is recorded and later reported as a diagnostic; it is
    /// never an error.
    pub fn metric_or(&self, producer: &ModuleId, metric: &str, default: f64) -> f64 {
        let entry = self.entries.get(producer);
        match entry.and_then(|(out, _)| out.get_f64(metric)) {
            Some(value) => value,
            None => {
                let initial = matches!(entry, Some((_, Resolution::Initial)));
                self.misses.borrow_mut().push(MissingInput {
                    producer: producer.clone(),
                    metric: metric.to_string(),
                    default,
                    initial,
                });
                default
            }
        }
    }

    /// Drains the recorded default substitutions.
    pub fn take_missing(&self) -> Vec<MissingInput> {
        std::mem::take(&mut *self.misses.borrow_mut())
    }
}

impl Default for ModuleInputs<'_> {
    fn default() -> Self {
        Self::new()
    }
}
