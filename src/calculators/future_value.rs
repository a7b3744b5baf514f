//! Future value of a lump sum plus regular contributions

use super::Calculator;
use crate::error::{ensure_finite, CalcError};
use crate::finance::{
    compound_lump_sum, effective_periodic_rate, future_value_of_annuity, periods_for_term,
    to_periodic_rate, Frequency, PaymentTiming,
};
use crate::guardrails::Guardrails;
use crate::input::{Bounds, Field, FormFields};
use crate::outcome::{ResultBuilder, ResultLine};

const INITIAL: Field = Field::new("initial_amount", "initial amount");
const CONTRIBUTION: Field = Field::new("contribution_amount", "regular contribution");
const RATE: Field = Field::new("annual_rate", "annual interest rate");
const YEARS: Field = Field::new("years", "time horizon (years)");
const COMPOUNDING: Field = Field::new("compounding_frequency", "compounding frequency");
const CONTRIBUTION_FREQUENCY: Field = Field::new("contribution_frequency", "contribution frequency");
const TIMING: Field = Field::new("contribution_timing", "contribution timing");

pub struct FutureValue;

impl Calculator for FutureValue {
    fn title(&self) -> &'static str {
        "Future Value Calculator"
    }

    fn calculate(
        &self,
        fields: &FormFields,
        _guardrails: &Guardrails,
    ) -> Result<Vec<ResultLine>, CalcError> {
        fields.require(&[
            INITIAL,
            CONTRIBUTION,
            RATE,
            YEARS,
            COMPOUNDING,
            CONTRIBUTION_FREQUENCY,
            TIMING,
        ])?;

        let present_value = fields.number(INITIAL, &Bounds::non_negative())?;
        let payment = fields.number(CONTRIBUTION, &Bounds::non_negative())?;
        let annual_rate = fields.number(RATE, &Bounds::non_negative())?;
        let years = fields.number(YEARS, &Bounds::positive())?;
        let compounding: Frequency = fields.choice(COMPOUNDING, None)?;
        let contribution_frequency: Frequency = fields.choice(CONTRIBUTION_FREQUENCY, None)?;
        let timing: PaymentTiming = fields.choice(TIMING, None)?;

        if present_value == 0.0 && payment == 0.0 {
            return Err(CalcError::inconsistent(
                "Enter an initial amount and/or a regular contribution to calculate a future value.",
            ));
        }

        let m = compounding.periods_per_year();
        let n = contribution_frequency.periods_per_year();

        // The lump sum compounds over the exact (possibly fractional) number of
        // compounding periods; contributions use whole contribution periods at the
        // equivalent rate
        let lump = compound_lump_sum(
            present_value,
            to_periodic_rate(annual_rate, m),
            years * m as f64,
        )?;
        let contribution_periods = periods_for_term(years, n)?;
        let contributions = future_value_of_annuity(
            0.0,
            payment,
            effective_periodic_rate(annual_rate, m, n),
            contribution_periods,
            timing,
        )?;

        let future_value = ensure_finite("future value", lump + contributions)?;
        let total_contributed = ensure_finite(
            "total contributed",
            present_value + payment * contribution_periods as f64,
        )?;
        let growth = future_value - total_contributed;

        let mut builder = ResultBuilder::new()
            .amount("Future value", future_value, "")?
            .amount("Total contributed", total_contributed, "")?
            .amount("Estimated growth (interest/returns)", growth, "")?
            .text(
                "Contribution periods",
                format!("{} ({})", contribution_periods, contribution_frequency.label()),
            );

        if payment > 0.0 && contribution_frequency != Frequency::Monthly {
            builder = builder.amount(
                "Approx. monthly equivalent contribution",
                payment * n as f64 / 12.0,
                "",
            )?;
        }

        if annual_rate == 0.0 {
            builder = builder.text(
                "Note",
                "With a 0% rate, your future value equals your total contributions.",
            );
        } else if growth < 0.0 {
            builder = builder.text(
                "Note",
                "The result shows negative growth. Double-check your inputs.",
            );
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::CalculationOutcome;

    fn form(initial: &str, contribution: &str, contribution_frequency: &str) -> FormFields {
        FormFields::from_pairs([
            ("initial_amount", initial),
            ("contribution_amount", contribution),
            ("annual_rate", "5"),
            ("years", "10"),
            ("compounding_frequency", "12"),
            ("contribution_frequency", contribution_frequency),
            ("contribution_timing", "end"),
        ])
    }

    fn run(fields: &FormFields) -> CalculationOutcome {
        CalculationOutcome::from_result(FutureValue.calculate(fields, &Guardrails::default()))
    }

    #[test]
    fn test_monthly_contributions() {
        let outcome = run(&form("1000", "100", "monthly"));
        assert_eq!(outcome.value("Future value"), Some("17,175.24"));
        assert_eq!(outcome.value("Total contributed"), Some("13,000.00"));
        assert_eq!(outcome.value("Estimated growth (interest/returns)"), Some("4,175.24"));
        assert_eq!(outcome.value("Contribution periods"), Some("120 (monthly)"));
        assert_eq!(outcome.value("Approx. monthly equivalent contribution"), None);
    }

    #[test]
    fn test_quarterly_contributions_use_effective_rate() {
        let outcome = run(&form("1000", "300", "4"));
        assert_eq!(outcome.value("Future value"), Some("17,110.72"));
        assert_eq!(outcome.value("Contribution periods"), Some("40 (quarterly)"));
        assert_eq!(outcome.value("Approx. monthly equivalent contribution"), Some("100.00"));
    }

    #[test]
    fn test_start_timing_grows_more() {
        let end = FutureValue
            .calculate(&form("0", "100", "12"), &Guardrails::default())
            .unwrap();
        let start = FutureValue
            .calculate(
                &form("0", "100", "12").with("contribution_timing", "start"),
                &Guardrails::default(),
            )
            .unwrap();
        let parse = |lines: &[ResultLine]| -> f64 { lines[0].value.replace(',', "").parse().unwrap() };
        assert!(parse(&start) > parse(&end));
    }

    #[test]
    fn test_zero_rate_note() {
        let outcome = run(&form("1000", "100", "12").with("annual_rate", "0"));
        assert_eq!(outcome.value("Future value"), Some("13,000.00"));
        assert_eq!(
            outcome.value("Note"),
            Some("With a 0% rate, your future value equals your total contributions.")
        );
    }

    #[test]
    fn test_lump_sum_uses_fractional_years() {
        let fields = form("1000", "0", "1")
            .with("annual_rate", "10")
            .with("years", "2.5")
            .with("compounding_frequency", "1");
        let outcome = run(&fields);
        // 1000 * 1.1^2.5
        assert_eq!(outcome.value("Future value"), Some("1,269.06"));
        assert_eq!(outcome.value("Contribution periods"), Some("3 (yearly)"));
    }

    #[test]
    fn test_nothing_to_grow() {
        assert_eq!(
            run(&form("0", "0", "12")).message(),
            Some("Enter an initial amount and/or a regular contribution to calculate a future value.")
        );
    }

    #[test]
    fn test_bad_frequency() {
        assert_eq!(
            run(&form("100", "10", "7")).message(),
            Some("Select a valid contribution frequency.")
        );
    }

    #[test]
    fn test_huge_horizon_overflows_cleanly() {
        let fields = form("1000000", "0", "12")
            .with("annual_rate", "900")
            .with("years", "5000");
        assert_eq!(
            run(&fields).message(),
            Some("The future value is too large to display. Try smaller values.")
        );
    }
}
