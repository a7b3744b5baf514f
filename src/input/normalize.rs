//! Input normalization and range validation
//!
//! `normalize` turns one raw form value into a validated float, and `check_range`
//! is the single parameterized bound check every calculator uses instead of its own
//! positive / non-negative / inclusive-range helpers.

use super::fields::{Field, RawValue};
use crate::error::CalcError;

/// Numeric bounds for a field, each side optional and independently inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub inclusive_min: bool,
    pub inclusive_max: bool,
}

impl Bounds {
    /// Any finite value
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
            inclusive_min: true,
            inclusive_max: true,
        }
    }

    /// Strictly greater than zero
    pub const fn positive() -> Self {
        Self {
            min: Some(0.0),
            max: None,
            inclusive_min: false,
            inclusive_max: true,
        }
    }

    /// Zero or greater
    pub const fn non_negative() -> Self {
        Self {
            min: Some(0.0),
            max: None,
            inclusive_min: true,
            inclusive_max: true,
        }
    }

    /// Inclusive on both ends
    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            inclusive_min: true,
            inclusive_max: true,
        }
    }

    /// Inclusive upper bound only
    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
            inclusive_min: true,
            inclusive_max: true,
        }
    }

    /// Tighten the upper bound, keeping the lower one
    pub fn with_max(mut self, max: f64, inclusive: bool) -> Self {
        self.max = Some(max);
        self.inclusive_max = inclusive;
        self
    }

    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let above_min = match self.min {
            Some(min) if self.inclusive_min => value >= min,
            Some(min) => value > min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) if self.inclusive_max => value <= max,
            Some(max) => value < max,
            None => true,
        };
        above_min && below_max
    }

    /// Message shown when a parsed value falls outside the bounds
    pub fn violation_message(&self, label: &str) -> String {
        match (self.min, self.max) {
            (Some(min), None) if min == 0.0 && !self.inclusive_min => {
                format!("Enter a valid {} greater than 0.", label)
            }
            (Some(min), None) if min == 0.0 => format!("Enter a valid {} (0 or higher).", label),
            (Some(min), None) if self.inclusive_min => {
                format!("{} must be {} or more.", capitalize(label), min)
            }
            (Some(min), None) => format!("{} must be greater than {}.", capitalize(label), min),
            (None, Some(max)) if self.inclusive_max => {
                format!("{} must be {} or less.", capitalize(label), max)
            }
            (None, Some(max)) => format!("{} must be less than {}.", capitalize(label), max),
            (Some(min), Some(max)) if self.inclusive_min && self.inclusive_max => {
                format!("{} must be between {} and {}.", capitalize(label), min, max)
            }
            (Some(min), Some(max)) => format!(
                "{} must be {} {} and {} {}.",
                capitalize(label),
                if self.inclusive_min { "at least" } else { "greater than" },
                min,
                if self.inclusive_max { "at most" } else { "less than" },
                max
            ),
            (None, None) => format!("Enter a valid {}.", label),
        }
    }

    /// Message shown when the value is blank or not a number
    pub fn invalid_message(&self, label: &str) -> String {
        match (self.min, self.max) {
            // The sign checks report blanks and bound failures identically
            (Some(min), None) if min == 0.0 => self.violation_message(label),
            _ => format!("Enter a valid {}.", label),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Check a value against bounds, naming the field in the error
pub fn check_range(value: f64, bounds: &Bounds, field: Field) -> Result<f64, CalcError> {
    if !value.is_finite() {
        return Err(CalcError::invalid(field.key, bounds.invalid_message(field.label)));
    }
    if !bounds.contains(value) {
        return Err(CalcError::out_of_range(field.key, bounds.violation_message(field.label)));
    }
    Ok(value)
}

/// Normalize a raw form value into a validated float.
///
/// Blank or unparseable input yields `fallback` when one is given (the fallback is
/// still range-checked), otherwise `InvalidInput`.
pub fn normalize(
    raw: Option<&RawValue>,
    fallback: Option<f64>,
    bounds: &Bounds,
    field: Field,
) -> Result<f64, CalcError> {
    let parsed = raw.and_then(RawValue::as_number);

    match (parsed, fallback) {
        (Some(value), _) | (None, Some(value)) => check_range(value, bounds, field),
        (None, None) => Err(CalcError::invalid(field.key, bounds.invalid_message(field.label))),
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Field = Field::new("area", "area");
    const WASTE: Field = Field::new("waste_percent", "waste factor");

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn test_normalize_parses_text_and_numbers() {
        let value = normalize(Some(&text("1,200")), None, &Bounds::positive(), AREA).unwrap();
        assert_eq!(value, 1200.0);

        let value = normalize(Some(&RawValue::Number(3.5)), None, &Bounds::positive(), AREA).unwrap();
        assert_eq!(value, 3.5);
    }

    #[test]
    fn test_blank_uses_fallback_or_fails() {
        let value = normalize(Some(&text("")), Some(0.0), &Bounds::non_negative(), WASTE).unwrap();
        assert_eq!(value, 0.0);

        let value = normalize(None, Some(10.0), &Bounds::non_negative(), WASTE).unwrap();
        assert_eq!(value, 10.0);

        let err = normalize(Some(&text("")), None, &Bounds::positive(), AREA).unwrap_err();
        assert_eq!(
            err,
            CalcError::invalid("area", "Enter a valid area greater than 0.")
        );
    }

    #[test]
    fn test_out_of_range_names_field_and_bound() {
        let err = normalize(Some(&text("0")), None, &Bounds::positive(), AREA).unwrap_err();
        assert!(matches!(err, CalcError::OutOfRange { ref field, .. } if field == "area"));
        assert_eq!(err.to_string(), "Enter a valid area greater than 0.");

        let bounds = Bounds::between(0.0, 50.0);
        let err = normalize(Some(&text("75")), None, &bounds, WASTE).unwrap_err();
        assert_eq!(err.to_string(), "Waste factor must be between 0 and 50.");

        let err = normalize(Some(&text("-1")), None, &Bounds::non_negative(), WASTE).unwrap_err();
        assert_eq!(err.to_string(), "Enter a valid waste factor (0 or higher).");
    }

    #[test]
    fn test_bounds_inclusivity() {
        let bounds = Bounds::between(20.0, 45.0);
        assert!(bounds.contains(20.0));
        assert!(bounds.contains(45.0));
        assert!(!bounds.contains(45.5));

        let exclusive = Bounds::positive().with_max(100.0, false);
        assert!(!exclusive.contains(0.0));
        assert!(!exclusive.contains(100.0));
        assert!(exclusive.contains(99.9));
        assert!(!exclusive.contains(f64::NAN));
    }

    #[test]
    fn test_upper_bound_message() {
        let err = check_range(120.0, &Bounds::at_most(100.0), Field::new("pct", "target percentage"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Target percentage must be 100 or less.");
    }
}
