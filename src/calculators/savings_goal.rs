//! Monthly contribution needed to reach a savings target

use super::Calculator;
use crate::error::CalcError;
use crate::finance::{contribution_for_goal, to_periodic_rate, AnnuityResult, PaymentTiming};
use crate::guardrails::Guardrails;
use crate::input::{Bounds, Field, FormFields};
use crate::outcome::{format_two_decimals, ResultBuilder, ResultLine};

const TARGET: Field = Field::new("target_amount", "savings goal");
const CURRENT: Field = Field::new("current_savings", "current savings");
const MONTHS: Field = Field::new("months_to_goal", "time to goal in months");
const RATE: Field = Field::new("annual_interest_rate", "annual interest rate");
const TIMING: Field = Field::new("contribution_timing", "contribution timing");

pub struct SavingsGoal;

impl Calculator for SavingsGoal {
    fn title(&self) -> &'static str {
        "Savings Goal Planner"
    }

    fn calculate(
        &self,
        fields: &FormFields,
        _guardrails: &Guardrails,
    ) -> Result<Vec<ResultLine>, CalcError> {
        fields.require(&[TARGET, MONTHS, TIMING])?;

        let target = fields.number(TARGET, &Bounds::positive())?;
        let months = fields.number(MONTHS, &Bounds::positive())?;
        if months.fract() != 0.0 {
            return Err(CalcError::invalid(
                MONTHS.key,
                "Time to goal must be a whole number of months.",
            ));
        }
        if months > u32::MAX as f64 {
            return Err(CalcError::out_of_range(MONTHS.key, "Time to goal is too long."));
        }
        let n = months as u32;

        let present_value = fields.number_or(CURRENT, 0.0, &Bounds::non_negative())?;
        let annual_rate = fields.number_or(RATE, 0.0, &Bounds::non_negative())?;
        let timing: PaymentTiming = fields.choice(TIMING, None)?;

        let rate = to_periodic_rate(annual_rate, 12);
        let contribution = contribution_for_goal(target, present_value, rate, n, timing)?;
        let projection = AnnuityResult::accumulate(present_value, contribution, rate, n, timing)?;

        let mut interest = projection.interest_component;
        // Rounding noise from the closed forms
        if interest < 0.0 && interest > -0.01 {
            interest = 0.0;
        }

        let note = if contribution == 0.0 {
            format!(
                "Based on your current savings and the interest rate, you are already on track to meet or exceed the goal within {} months.",
                n
            )
        } else if annual_rate == 0.0 {
            "Interest is set to 0%, so this is a straight-line savings plan. If your savings earn interest, add a rate to refine the estimate.".to_string()
        } else {
            format!(
                "This assumes a constant {}% annual rate compounded monthly and equal contributions at the {} of each month.",
                format_two_decimals(annual_rate),
                timing
            )
        };

        Ok(ResultBuilder::new()
            .amount("Monthly savings required", contribution, "")?
            .amount("Total contributions", projection.total_contributions, "")?
            .amount("Estimated interest earned", interest, "")?
            .amount("Projected end balance", projection.future_value, "")?
            .text("Note", note)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::CalculationOutcome;

    fn run(fields: &FormFields) -> CalculationOutcome {
        CalculationOutcome::from_result(SavingsGoal.calculate(fields, &Guardrails::default()))
    }

    fn form(target: &str, current: &str, months: &str, rate: &str) -> FormFields {
        FormFields::from_pairs([
            ("target_amount", target),
            ("current_savings", current),
            ("months_to_goal", months),
            ("annual_interest_rate", rate),
            ("contribution_timing", "end"),
        ])
    }

    #[test]
    fn test_straight_line_plan() {
        let outcome = run(&form("12000", "2000", "24", "0"));
        assert_eq!(outcome.value("Monthly savings required"), Some("416.67"));
        assert_eq!(outcome.value("Total contributions"), Some("10,000.00"));
        assert_eq!(outcome.value("Estimated interest earned"), Some("0.00"));
        assert_eq!(outcome.value("Projected end balance"), Some("12,000.00"));
    }

    #[test]
    fn test_interest_reduces_contribution() {
        let flat = contribution_for_goal(12000.0, 2000.0, 0.0, 24, PaymentTiming::End).unwrap();
        let outcome = run(&form("12000", "2000", "24", "5"));
        let monthly: f64 = outcome
            .value("Monthly savings required")
            .unwrap()
            .parse()
            .unwrap();
        assert!(monthly < flat, "{} should be below {}", monthly, flat);
        assert_eq!(outcome.value("Projected end balance"), Some("12,000.00"));
    }

    #[test]
    fn test_blank_optional_fields_default_to_zero() {
        let outcome = run(&form("1200", "", "12", ""));
        assert_eq!(outcome.value("Monthly savings required"), Some("100.00"));
    }

    #[test]
    fn test_already_on_track() {
        let outcome = run(&form("1000", "1500", "6", "3"));
        assert_eq!(outcome.value("Monthly savings required"), Some("0.00"));
        assert!(outcome.value("Note").unwrap().contains("already on track"));
    }

    #[test]
    fn test_fractional_months_rejected() {
        assert_eq!(
            run(&form("1000", "0", "6.5", "0")).message(),
            Some("Time to goal must be a whole number of months.")
        );
    }

    #[test]
    fn test_timing_is_required() {
        let fields = FormFields::from_pairs([("target_amount", "1000"), ("months_to_goal", "10")]);
        assert_eq!(run(&fields), CalculationOutcome::Skipped);

        let fields = form("1000", "0", "10", "0").with("contribution_timing", "whenever");
        assert_eq!(run(&fields).message(), Some("Select a valid contribution timing."));
    }
}
