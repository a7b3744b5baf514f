//! Error taxonomy shared by every calculator
//!
//! Validation is fail-fast: the first failing check produces the error and no
//! numeric output is rendered for that invocation.

use thiserror::Error;

/// Reasons a calculation can stop before producing result lines
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// A required field is not part of the form at all.
    /// Callers treat this as a silent no-op rather than a user-visible failure.
    #[error("field `{field}` is not present in the form")]
    MissingInput { field: String },

    /// A field is blank, not a number, or fails a domain constraint
    #[error("{message}")]
    InvalidInput { field: String, message: String },

    /// A field parsed correctly but lies outside its allowed bounds
    #[error("{message}")]
    OutOfRange { field: String, message: String },

    /// Individually valid fields combine into an impossible scenario
    #[error("{0}")]
    LogicalInconsistency(String),

    /// A closed-form result came out as NaN or infinity
    #[error("The {quantity} is too large to display. Try smaller values.")]
    ComputationOverflow { quantity: String },
}

impl CalcError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn out_of_range(field: &str, message: impl Into<String>) -> Self {
        CalcError::OutOfRange {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn inconsistent(message: impl Into<String>) -> Self {
        CalcError::LogicalInconsistency(message.into())
    }

    pub fn overflow(quantity: &str) -> Self {
        CalcError::ComputationOverflow {
            quantity: quantity.to_string(),
        }
    }

    /// Whether this error should be swallowed instead of shown to the user
    pub fn is_silent(&self) -> bool {
        matches!(self, CalcError::MissingInput { .. })
    }
}

/// Reject NaN and infinity before a value reaches the formatter
pub fn ensure_finite(quantity: &str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::overflow(quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        let err = CalcError::invalid("loan_amount", "Enter a valid loan amount greater than 0.");
        assert_eq!(err.to_string(), "Enter a valid loan amount greater than 0.");

        let err = CalcError::overflow("future value");
        assert_eq!(
            err.to_string(),
            "The future value is too large to display. Try smaller values."
        );
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("payment", 12.5), Ok(12.5));
        assert!(matches!(
            ensure_finite("payment", f64::INFINITY),
            Err(CalcError::ComputationOverflow { .. })
        ));
        assert!(ensure_finite("payment", f64::NAN).is_err());
    }

    #[test]
    fn test_only_missing_input_is_silent() {
        let missing = CalcError::MissingInput { field: "area".to_string() };
        assert!(missing.is_silent());
        assert!(!CalcError::inconsistent("nope").is_silent());
    }
}
