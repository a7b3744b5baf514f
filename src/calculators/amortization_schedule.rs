//! Monthly amortization with optional extra principal payments

use super::Calculator;
use crate::error::CalcError;
use crate::finance::{AmortizationSchedule, LoanTerms};
use crate::guardrails::Guardrails;
use crate::input::{Bounds, Field, FormFields};
use crate::outcome::{format_two_decimals, ResultBuilder, ResultLine};

const LOAN: Field = Field::new("loan_amount", "loan amount");
const RATE: Field = Field::new("annual_rate", "interest rate");
const TERM: Field = Field::new("term_years", "loan term");
const EXTRA: Field = Field::new("extra_payment", "extra monthly payment");

pub struct AmortizationScheduleCalculator;

impl AmortizationScheduleCalculator {
    /// Validate the form and build the full month-by-month schedule
    pub fn schedule(
        &self,
        fields: &FormFields,
        guardrails: &Guardrails,
    ) -> Result<AmortizationSchedule, CalcError> {
        fields.require(&[LOAN, RATE, TERM])?;

        let principal = fields.number(LOAN, &Bounds::positive())?;
        let annual_rate = fields.number(RATE, &Bounds::non_negative())?;
        let term_years = fields.number(TERM, &Bounds::positive())?;
        let extra = fields.number_or(EXTRA, 0.0, &Bounds::non_negative())?;

        let guards = &guardrails.amortization;
        if let Some(max_rate) = guards.max_annual_rate {
            if annual_rate > max_rate {
                return Err(CalcError::out_of_range(
                    RATE.key,
                    format!("Interest rate looks unusually high. Enter an APR below {}%.", max_rate),
                ));
            }
        }
        if let Some(max_years) = guards.max_term_years {
            if term_years > max_years {
                return Err(CalcError::out_of_range(
                    TERM.key,
                    format!("Loan term looks unusually long. Enter a term under {} years.", max_years),
                ));
            }
        }

        let terms = LoanTerms::new(principal, annual_rate, term_years, 12)?;
        AmortizationSchedule::build(terms, extra)
    }
}

fn payoff_text(months: u32) -> String {
    let years = months / 12;
    if years > 0 {
        format!("{} years {} months", years, months % 12)
    } else {
        format!("{} months", months)
    }
}

impl Calculator for AmortizationScheduleCalculator {
    fn title(&self) -> &'static str {
        "Amortization Schedule Calculator"
    }

    fn calculate(
        &self,
        fields: &FormFields,
        guardrails: &Guardrails,
    ) -> Result<Vec<ResultLine>, CalcError> {
        let schedule = self.schedule(fields, guardrails)?;
        let summary = schedule.summary()?;

        let builder = ResultBuilder::new()
            .amount("Estimated monthly payment", schedule.scheduled_payment, "")?
            .amount("Total interest (with extra payments)", summary.total_interest, "")?
            .amount("Total paid (with extra payments)", summary.total_paid, "")?
            .text(
                "Estimated payoff time (with extra payments)",
                payoff_text(summary.periods),
            );

        let builder = if schedule.extra_payment > 0.0 {
            builder.text(
                "Impact of extra payments",
                format!(
                    "You save about {} in interest and finish about {} months earlier, compared to making only the scheduled payment.",
                    format_two_decimals(summary.interest_saved),
                    summary.periods_saved
                ),
            )
        } else {
            builder.text(
                "Tip",
                "Add a small extra monthly payment to see how much interest you can save and how much sooner you can finish.",
            )
        };

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::CalculationOutcome;

    fn form(extra: &str) -> FormFields {
        FormFields::from_pairs([
            ("loan_amount", "100000"),
            ("annual_rate", "6"),
            ("term_years", "30"),
            ("extra_payment", extra),
        ])
    }

    fn run(fields: &FormFields, guardrails: &Guardrails) -> CalculationOutcome {
        CalculationOutcome::from_result(AmortizationScheduleCalculator.calculate(fields, guardrails))
    }

    #[test]
    fn test_without_extra_payment() {
        let outcome = run(&form(""), &Guardrails::default());
        assert_eq!(outcome.value("Estimated monthly payment"), Some("599.55"));
        assert_eq!(
            outcome.value("Estimated payoff time (with extra payments)"),
            Some("30 years 0 months")
        );
        assert!(outcome.value("Tip").is_some());
    }

    #[test]
    fn test_extra_payment_shortens_loan() {
        let outcome = run(&form("100"), &Guardrails::default());
        let impact = outcome.value("Impact of extra payments").unwrap();
        assert!(impact.starts_with("You save about "));

        let schedule = AmortizationScheduleCalculator
            .schedule(&form("100"), &Guardrails::default())
            .unwrap();
        let summary = schedule.summary().unwrap();
        assert!(summary.periods < 360);
        assert!(summary.interest_saved > 0.0);
        assert_eq!(summary.periods_saved, 360 - summary.periods);
    }

    #[test]
    fn test_rate_guardrail() {
        let fields = form("0").with("annual_rate", "250");
        assert_eq!(
            run(&fields, &Guardrails::default()).message(),
            Some("Interest rate looks unusually high. Enter an APR below 200%.")
        );

        let mut relaxed = Guardrails::default();
        relaxed.amortization.max_annual_rate = None;
        assert!(run(&fields.with("term_years", "5"), &relaxed).is_ok());
    }

    #[test]
    fn test_term_guardrail() {
        let fields = form("0").with("term_years", "150");
        assert_eq!(
            run(&fields, &Guardrails::default()).message(),
            Some("Loan term looks unusually long. Enter a term under 100 years.")
        );
    }

    #[test]
    fn test_payoff_text() {
        assert_eq!(payoff_text(7), "7 months");
        assert_eq!(payoff_text(12), "1 years 0 months");
        assert_eq!(payoff_text(305), "25 years 5 months");
    }
}
