//! Result assembly: labeled output lines and the ok / error envelope

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, CalcError};

/// One labeled line of calculator output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLine {
    pub label: String,
    pub value: String,
}

impl ResultLine {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Ordered collection of result lines with finite-value checks on every number
#[derive(Debug, Clone, Default)]
pub struct ResultBuilder {
    lines: Vec<ResultLine>,
}

impl ResultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text line
    pub fn text(mut self, label: &str, value: impl Into<String>) -> Self {
        self.lines.push(ResultLine::new(label, value));
        self
    }

    /// Number rendered with two decimals and an optional unit suffix
    pub fn amount(mut self, label: &str, value: f64, unit: &str) -> Result<Self, CalcError> {
        let value = ensure_finite(&label.to_lowercase(), value)?;
        let rendered = if unit.is_empty() {
            format_two_decimals(value)
        } else {
            format!("{} {}", format_two_decimals(value), unit)
        };
        self.lines.push(ResultLine::new(label, rendered));
        Ok(self)
    }

    /// Percentage rendered with two decimals
    pub fn percent(mut self, label: &str, value: f64) -> Result<Self, CalcError> {
        let value = ensure_finite(&label.to_lowercase(), value)?;
        self.lines.push(ResultLine::new(label, format!("{}%", format_two_decimals(value))));
        Ok(self)
    }

    pub fn build(self) -> Vec<ResultLine> {
        self.lines
    }
}

/// Outcome of one invocation in its wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CalculationOutcome {
    Ok { fields: Vec<ResultLine> },
    Error { message: String },
    /// A required field was never bound; nothing is shown
    Skipped,
}

impl CalculationOutcome {
    pub fn from_result(result: Result<Vec<ResultLine>, CalcError>) -> Self {
        match result {
            Ok(fields) => CalculationOutcome::Ok { fields },
            Err(err) if err.is_silent() => CalculationOutcome::Skipped,
            Err(err) => CalculationOutcome::Error {
                message: err.to_string(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CalculationOutcome::Ok { .. })
    }

    pub fn status(&self) -> &'static str {
        match self {
            CalculationOutcome::Ok { .. } => "ok",
            CalculationOutcome::Error { .. } => "error",
            CalculationOutcome::Skipped => "skipped",
        }
    }

    /// Value of the first line with the given label
    pub fn value(&self, label: &str) -> Option<&str> {
        match self {
            CalculationOutcome::Ok { fields } => fields
                .iter()
                .find(|line| line.label == label)
                .map(|line| line.value.as_str()),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            CalculationOutcome::Error { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Fixed two-decimal rendering with thousands separators ("12,345.60")
pub fn format_two_decimals(value: f64) -> String {
    format_with_commas(value, 2)
}

/// Fixed-decimal rendering with thousands separators
pub fn format_with_commas(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Avoid "-0.00" for values that round to zero
    let is_zero = rendered.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
