//! Per-module parameter parsing and validation.
//!
//! Every sub-model owns a `*Params` struct with the documented initial
//! conditions as defaults. Configuration supplies a free-form JSON object per
//! module; unknown fields, wrong types and out-of-range values are
//! configuration errors raised before the run starts.

use digisim_kernel::{ConfigError, ModuleId};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Typed initial parameters of one module.
pub trait ModuleParams: DeserializeOwned + Default {
    /// Checks ranges; called right after parsing.
    fn validate(&self, module: &ModuleId) -> Result<(), ConfigError>;
}

/// Parses (or defaults) and validates the parameters for `module`.
pub fn parse<P: ModuleParams>(module: &ModuleId, raw: Option<&Value>) -> Result<P, ConfigError> {
    let params: P = match raw {
        None | Some(Value::Null) => P::default(),
        Some(value @ Value::Object(_)) => serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::params(module, e.to_string()))?,
        Some(other) => {
            return Err(ConfigError::params(
                module,
                format!("expected an object, found {}", json_kind(other)),
            ))
        }
    };
    params.validate(module)?;
    Ok(params)
}

/// Requires a finite value in `[0, 1]`.
pub fn share(module: &ModuleId, field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::params(
            module,
            format!("'{}' must be in [0, 1], got {}", field, value),
        ))
    }
}

/// Requires a finite value `>= 0`.
pub fn non_negative(module: &ModuleId, field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::params(
            module,
            format!("'{}' must be a finite value >= 0, got {}", field, value),
        ))
    }
}

/// Requires a finite value in `[lo, hi]`.
pub fn within(module: &ModuleId, field: &str, value: f64, lo: f64, hi: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= lo && value <= hi {
        Ok(())
    } else {
        Err(ConfigError::params(
            module,
            format!("'{}' must be in [{}, {}], got {}", field, lo, hi, value),
        ))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(default, deny_unknown_fields)]
    struct Probe {
        rate: f64,
    }

    impl Default for Probe {
        fn default() -> Self {
            Self { rate: 0.25 }
        }
    }

    impl ModuleParams for Probe {
        fn validate(&self, module: &ModuleId) -> Result<(), ConfigError> {
            share(module, "rate", self.rate)
        }
    }

    const PROBE: ModuleId = ModuleId::from_static("probe");

    #[test]
    fn test_missing_params_use_defaults() {
        let p: Probe = parse(&PROBE, None).unwrap();
        assert_eq!(p, Probe::default());
    }

    #[test]
    fn test_override_and_range_check() {
        let p: Probe = parse(&PROBE, Some(&json!({ "rate": 0.9 }))).unwrap();
        assert_eq!(p.rate, 0.9);

        let err = parse::<Probe>(&PROBE, Some(&json!({ "rate": 1.5 }))).unwrap_err();
        assert!(err.to_string().contains("'rate' must be in [0, 1]"));
    }

    #[test]
    fn test_structurally_invalid_params() {
        assert!(parse::<Probe>(&PROBE, Some(&json!({ "speed": 1.0 }))).is_err());
        assert!(parse::<Probe>(&PROBE, Some(&json!({ "rate": "high" }))).is_err());
        assert!(parse::<Probe>(&PROBE, Some(&json!([1, 2]))).is_err());
    }
}
