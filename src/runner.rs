//! Calculator runner for single and batch invocations
//!
//! Holds the guardrails once, then dispatches any number of requests against
//! them. Batches run in parallel; every request is independent.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calculators::CalculatorKind;
use crate::error::CalcError;
use crate::guardrails::{ConfigError, Guardrails};
use crate::input::FormFields;
use crate::outcome::CalculationOutcome;

/// One calculator invocation as it arrives over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Caller-chosen tag echoed back in the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub calculator: CalculatorKind,
    #[serde(default)]
    pub fields: FormFields,
}

impl CalculationRequest {
    pub fn new(calculator: CalculatorKind, fields: FormFields) -> Self {
        Self {
            id: None,
            calculator,
            fields,
        }
    }
}

/// Outcome of one request, tagged with what produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub calculator: CalculatorKind,
    #[serde(flatten)]
    pub outcome: CalculationOutcome,
}

/// Runs calculators against a fixed set of guardrails
///
/// # Example
/// ```ignore
/// let runner = CalculatorRunner::from_env()?;
/// let fields = FormFields::from_pairs([("target_amount", "12000"), ...]);
/// let outcome = runner.run(CalculatorKind::SavingsGoal, &fields);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CalculatorRunner {
    guardrails: Guardrails,
}

impl CalculatorRunner {
    /// Runner with the built-in guardrails
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with guardrails from `CALC_GUARDRAILS`, or the built-in ones
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            guardrails: Guardrails::from_env()?,
        })
    }

    pub fn with_guardrails(guardrails: Guardrails) -> Self {
        Self { guardrails }
    }

    /// Run one calculator. Never fails: errors become `Error` or `Skipped` outcomes.
    pub fn run(&self, kind: CalculatorKind, fields: &FormFields) -> CalculationOutcome {
        let result = kind.calculator().calculate(fields, &self.guardrails);
        match &result {
            Err(err @ CalcError::ComputationOverflow { .. }) => log::warn!("{}: {}", kind, err),
            Err(err) => log::debug!("{} stopped: {:?}", kind, err),
            Ok(lines) => log::debug!("{} produced {} lines", kind, lines.len()),
        }
        CalculationOutcome::from_result(result)
    }

    pub fn run_request(&self, request: &CalculationRequest) -> CalculationResponse {
        CalculationResponse {
            id: request.id.clone(),
            calculator: request.calculator,
            outcome: self.run(request.calculator, &request.fields),
        }
    }

    /// Run many requests in parallel; responses keep the input order
    pub fn run_batch(&self, requests: &[CalculationRequest]) -> Vec<CalculationResponse> {
        let responses: Vec<CalculationResponse> =
            requests.par_iter().map(|r| self.run_request(r)).collect();

        let failed = responses
            .iter()
            .filter(|r| matches!(r.outcome, CalculationOutcome::Error { .. }))
            .count();
        log::info!(
            "Ran {} calculations ({} with validation errors)",
            responses.len(),
            failed
        );

        responses
    }

    pub fn guardrails(&self) -> &Guardrails {
        &self.guardrails
    }

    pub fn guardrails_mut(&mut self) -> &mut Guardrails {
        &mut self.guardrails
    }
}
