//! Declared metric schemas.
//!
//! A module's schema is the fixed list of metric names it emits every year.
//! Schemas are checked once when the simulation is assembled, and every
//! output is checked against its schema before a year is sealed.

use crate::error::ConfigError;
use crate::output::ModuleOutput;
use crate::types::ModuleId;
use std::collections::HashSet;

/// The stable metric names of one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSchema {
    names: &'static [&'static str],
}

impl MetricSchema {
    /// Creates a schema from a static name list.
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    /// Declared metric names, in declaration order.
    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    /// True if the schema declares `metric`.
    pub fn contains(&self, metric: &str) -> bool {
        self.names.iter().any(|n| *n == metric)
    }

    /// Number of declared metrics.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the schema declares nothing.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Validates the schema itself: non-empty, unique, `[a-z0-9_]` names.
    pub fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
        if self.names.is_empty() {
            return Err(ConfigError::schema(module, "schema declares no metrics"));
        }

        let mut seen = HashSet::new();
        for name in self.names {
            if name.is_empty() {
                return Err(ConfigError::schema(module, "empty metric name"));
            }
            if !name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            {
                return Err(ConfigError::schema(
                    module,
                    format!("metric '{}' must use [a-z0-9_]", name),
                ));
            }
            if !seen.insert(*name) {
                return Err(ConfigError::schema(
                    module,
                    format!("metric '{}' declared twice", name),
                ));
            }
        }
        Ok(())
    }

    /// Checks that `output` carries exactly the declared metrics.
    ///
    /// Returns a description of the first mismatch.
    pub fn check(&self, output: &ModuleOutput) -> Result<(), String> {
        if let Some(missing) = self.names.iter().find(|n| output.get(n).is_none()) {
            return Err(format!("declared metric '{}' missing", missing));
        }
        if let Some(extra) = output.names().find(|n| !self.contains(n)) {
            return Err(format!("undeclared metric '{}'", extra));
        }
        Ok(())
    }
}
