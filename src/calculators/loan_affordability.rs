//! How much loan a monthly budget supports, or whether a given loan fits it

use std::str::FromStr;

use super::Calculator;
use crate::error::CalcError;
use crate::finance::{payment_for_loan, periods_for_term, principal_for_payment, to_periodic_rate};
use crate::guardrails::Guardrails;
use crate::input::{check_range, Bounds, Field, FormFields};
use crate::outcome::{ResultBuilder, ResultLine};

const INCOME: Field = Field::new("monthly_income", "monthly net income");
const EXPENSES: Field = Field::new("monthly_expenses", "monthly essential expenses");
const DEBT: Field = Field::new("existing_debt", "existing monthly debt payments");
const PERCENT: Field = Field::new("affordability_percent", "target percentage");
const RATE: Field = Field::new("annual_rate", "interest rate");
const TERM: Field = Field::new("term_years", "loan term (years)");
const MODE: Field = Field::new("mode", "calculation mode");
const DESIRED: Field = Field::new("desired_loan_amount", "loan amount to check");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeSelect {
    MaxLoan,
    CheckLoan,
}

impl FromStr for ModeSelect {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max-loan" | "maxloan" => Ok(ModeSelect::MaxLoan),
            "check-loan" | "checkloan" => Ok(ModeSelect::CheckLoan),
            _ => Err(()),
        }
    }
}

/// Mode together with the data only that mode needs
#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    MaxLoan,
    CheckLoan { desired_principal: f64 },
}

pub struct LoanAffordability;

impl Calculator for LoanAffordability {
    fn title(&self) -> &'static str {
        "Loan Affordability Calculator"
    }

    fn calculate(
        &self,
        fields: &FormFields,
        guardrails: &Guardrails,
    ) -> Result<Vec<ResultLine>, CalcError> {
        fields.require(&[INCOME, EXPENSES, DEBT, PERCENT, RATE, TERM])?;
        let mode = fields.choice(MODE, Some(ModeSelect::MaxLoan))?;

        let income = fields.number(INCOME, &Bounds::positive())?;
        let expenses = fields.number(EXPENSES, &Bounds::non_negative())?;
        let debt = fields.number(DEBT, &Bounds::non_negative())?;
        let percent = fields.number(PERCENT, &Bounds::positive())?;
        let max_percent = guardrails.loan_affordability.max_percent;
        if percent > max_percent {
            return Err(CalcError::out_of_range(
                PERCENT.key,
                format!("Target percentage should be {} or less.", max_percent),
            ));
        }
        let annual_rate = fields.number(RATE, &Bounds::non_negative())?;
        let term_years = fields.number(TERM, &Bounds::positive())?;

        let remaining = income - expenses - debt;
        if remaining <= 0.0 {
            return Err(CalcError::inconsistent(
                "Your remaining budget is 0 or less. Increase income or reduce expenses and existing debt.",
            ));
        }
        let payment_limit = remaining * percent / 100.0;

        let mode = match mode {
            ModeSelect::MaxLoan => Mode::MaxLoan,
            ModeSelect::CheckLoan => {
                let desired = fields.get(DESIRED.key)?.and_then(|v| v.as_number());
                let desired_principal = match desired {
                    Some(value) => check_range(value, &Bounds::positive(), DESIRED)?,
                    None => {
                        return Err(CalcError::invalid(
                            DESIRED.key,
                            Bounds::positive().invalid_message(DESIRED.label),
                        ))
                    }
                };
                Mode::CheckLoan { desired_principal }
            }
        };

        let rate = to_periodic_rate(annual_rate, 12);
        let n = periods_for_term(term_years, 12)?;

        let builder = ResultBuilder::new().amount("Estimated payment limit", payment_limit, "")?;

        let lines = match mode {
            Mode::CheckLoan { desired_principal } => {
                let required = payment_for_loan(desired_principal, rate, n)?;
                let total_paid = required * n as f64;
                let status = if required <= payment_limit {
                    "Within your estimated limit"
                } else {
                    "Above your estimated limit"
                };
                builder
                    .amount("Required monthly payment", required, "")?
                    .text("Status", status)
                    .amount("Total repaid (estimated)", total_paid, "")?
                    .amount("Total interest (estimated)", total_paid - desired_principal, "")?
                    .text(
                        "Note",
                        "Excludes fees and insurance. Use this as a baseline and compare to lender quotes.",
                    )
            }
            Mode::MaxLoan => {
                let max_principal = principal_for_payment(payment_limit, rate, n)?;
                let total_paid = payment_limit * n as f64;
                builder
                    .amount("Maximum affordable loan amount (estimated)", max_principal, "")?
                    .amount("Total repaid (estimated)", total_paid, "")?
                    .amount("Total interest (estimated)", total_paid - max_principal, "")?
                    .text(
                        "Note",
                        "Excludes fees and insurance. Lower payments are safer than maximizing borrowing.",
                    )
            }
        };

        Ok(lines.build())
    }
}
