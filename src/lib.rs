//! Calculator Suite - closed-form calculators behind one validated input pipeline
//!
//! This library provides:
//! - Form-field parsing and range normalization shared by every calculator
//! - Annuity, loan payment and amortization math with exact zero-rate handling
//! - Loan, savings, construction, engineering, statistics, travel and health calculators
//! - Configurable guardrails for "does this look sensible" checks
//! - A runner for single and parallel batch invocations

pub mod error;
pub mod input;
pub mod finance;
pub mod units;
pub mod outcome;
pub mod guardrails;
pub mod calculators;
pub mod runner;

// Re-export commonly used types
pub use error::CalcError;
pub use input::{Bounds, Field, FormFields, RawValue};
pub use finance::{AnnuityResult, AmortizationSchedule, Frequency, LoanTerms, PaymentTiming};
pub use outcome::{CalculationOutcome, ResultLine};
pub use guardrails::{ConfigError, Guardrails};
pub use calculators::{Calculator, CalculatorKind};
pub use runner::{CalculationRequest, CalculationResponse, CalculatorRunner};
