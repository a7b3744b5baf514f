//! Policy thresholds for the "does this look sensible" checks
//!
//! These are product heuristics rather than mathematical limits, so they live in
//! configuration. Every section has defaults matching the published calculators, and a
//! JSON file only needs to name the values it overrides. Optional limits set to `null`
//! disable the check.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the path of a guardrails JSON file
pub const GUARDRAILS_ENV_VAR: &str = "CALC_GUARDRAILS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to open guardrails file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid guardrails file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid guardrail value: {0}")]
    Invalid(String),
}

/// Inclusive numeric window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeGuard {
    pub min: f64,
    pub max: f64,
}

impl RangeGuard {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanAffordabilityGuards {
    /// Largest share of the remaining budget a payment may take, in percent
    pub max_percent: f64,
}

impl Default for LoanAffordabilityGuards {
    fn default() -> Self {
        Self { max_percent: 100.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmortizationGuards {
    pub max_annual_rate: Option<f64>,
    pub max_term_years: Option<f64>,
}

impl Default for AmortizationGuards {
    fn default() -> Self {
        Self {
            max_annual_rate: Some(200.0),
            max_term_years: Some(100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsphaltGuards {
    pub max_waste_percent: Option<f64>,
    /// Accepted density window in lb/ft³
    pub density_range: Option<RangeGuard>,
    /// Density used when the field is left blank, lb/ft³
    pub default_density: f64,
}

impl Default for AsphaltGuards {
    fn default() -> Self {
        Self {
            max_waste_percent: Some(50.0),
            density_range: Some(RangeGuard::new(100.0, 170.0)),
            default_density: 145.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydraulicGuards {
    pub default_efficiency_percent: f64,
    /// Entered efficiencies are clamped into this window
    pub efficiency_clamp: RangeGuard,
}

impl Default for HydraulicGuards {
    fn default() -> Self {
        Self {
            default_efficiency_percent: 90.0,
            efficiency_clamp: RangeGuard::new(1.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteGuards {
    pub default_detour_percent: f64,
    /// Width of the low/high band around the detour estimate, in points
    pub detour_spread_percent: f64,
    pub default_speed_kmh: f64,
    pub default_speed_mph: f64,
}

impl Default for RouteGuards {
    fn default() -> Self {
        Self {
            default_detour_percent: 15.0,
            detour_spread_percent: 5.0,
            default_speed_kmh: 80.0,
            default_speed_mph: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DueDateGuards {
    pub cycle_length_range: Option<RangeGuard>,
    pub default_cycle_length: u32,
}

impl Default for DueDateGuards {
    fn default() -> Self {
        Self {
            cycle_length_range: Some(RangeGuard::new(20.0, 45.0)),
            default_cycle_length: 28,
        }
    }
}

/// All calculator guardrails
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Guardrails {
    pub loan_affordability: LoanAffordabilityGuards,
    pub amortization: AmortizationGuards,
    pub asphalt: AsphaltGuards,
    pub hydraulic: HydraulicGuards,
    pub route: RouteGuards,
    pub due_date: DueDateGuards,
}

impl Guardrails {
    /// Load overrides from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let guardrails: Guardrails =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        guardrails.validate()?;
        Ok(guardrails)
    }

    /// Load from the file named by `CALC_GUARDRAILS`, or defaults when it is unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(GUARDRAILS_ENV_VAR) {
            Some(path) => Self::from_json_path(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// Reject configurations no calculator could honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("asphalt.density_range", self.asphalt.density_range),
            ("hydraulic.efficiency_clamp", Some(self.hydraulic.efficiency_clamp)),
            ("due_date.cycle_length_range", self.due_date.cycle_length_range),
        ];
        for (name, window) in windows {
            if let Some(w) = window {
                if !(w.min.is_finite() && w.max.is_finite()) || w.min > w.max {
                    return Err(ConfigError::Invalid(format!("{} must have min <= max", name)));
                }
            }
        }

        if !(self.loan_affordability.max_percent > 0.0) {
            return Err(ConfigError::Invalid(
                "loan_affordability.max_percent must be greater than 0".to_string(),
            ));
        }
        if !(self.asphalt.default_density > 0.0) {
            return Err(ConfigError::Invalid(
                "asphalt.default_density must be greater than 0".to_string(),
            ));
        }
        if !(self.route.default_speed_kmh > 0.0 && self.route.default_speed_mph > 0.0) {
            return Err(ConfigError::Invalid("route default speeds must be greater than 0".to_string()));
        }
        if self.due_date.default_cycle_length == 0 {
            return Err(ConfigError::Invalid(
                "due_date.default_cycle_length must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let guardrails = Guardrails::default();
        assert!(guardrails.validate().is_ok());
        assert_eq!(guardrails.asphalt.default_density, 145.0);
        assert_eq!(guardrails.due_date.default_cycle_length, 28);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let json = r#"{ "asphalt": { "max_waste_percent": 30 }, "route": { "default_speed_kmh": 90 } }"#;
        let guardrails: Guardrails = serde_json::from_str(json).unwrap();

        assert_eq!(guardrails.asphalt.max_waste_percent, Some(30.0));
        assert_eq!(guardrails.asphalt.default_density, 145.0);
        assert_eq!(guardrails.route.default_speed_kmh, 90.0);
        assert_eq!(guardrails.route.default_speed_mph, 50.0);
        assert_eq!(guardrails.hydraulic, HydraulicGuards::default());
    }

    #[test]
    fn test_null_disables_a_check() {
        let json = r#"{ "asphalt": { "density_range": null } }"#;
        let guardrails: Guardrails = serde_json::from_str(json).unwrap();
        assert_eq!(guardrails.asphalt.density_range, None);
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        let mut guardrails = Guardrails::default();
        guardrails.due_date.cycle_length_range = Some(RangeGuard::new(45.0, 20.0));
        assert!(matches!(guardrails.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Guardrails::from_json_path("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn test_range_guard_clamp() {
        let window = RangeGuard::new(1.0, 100.0);
        assert_eq!(window.clamp(0.2), 1.0);
        assert_eq!(window.clamp(140.0), 100.0);
        assert_eq!(window.clamp(85.0), 85.0);
        assert!(window.contains(100.0));
    }
}
