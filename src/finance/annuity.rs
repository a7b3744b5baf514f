//! Time-value-of-money closed forms for level annuities
//!
//! Three unknowns share one set of formulas: the payment on a loan, the future value
//! of a lump sum plus contributions, and the principal a payment can carry. Every
//! formula has an explicit zero-rate branch so `r` never lands in a denominator as 0.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::rate::{periods_for_term, to_periodic_rate};
use crate::error::{ensure_finite, CalcError};

/// When in each period the contribution is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentTiming {
    /// Ordinary annuity: contributions at the end of each period
    End,
    /// Annuity due: contributions at the start of each period
    Start,
}

impl fmt::Display for PaymentTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentTiming::End => f.write_str("end"),
            PaymentTiming::Start => f.write_str("start"),
        }
    }
}

impl FromStr for PaymentTiming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "end" => Ok(PaymentTiming::End),
            "start" | "beginning" => Ok(PaymentTiming::Start),
            other => Err(format!("Unknown payment timing: {}", other)),
        }
    }
}

/// Terms of an amortizing loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub periods_per_year: u32,
    /// `term_years × periods_per_year`, rounded, at least 1
    pub num_periods: u32,
}

impl LoanTerms {
    pub fn new(
        principal: f64,
        annual_rate_percent: f64,
        term_years: f64,
        periods_per_year: u32,
    ) -> Result<Self, CalcError> {
        if !principal.is_finite() || principal < 0.0 {
            return Err(CalcError::invalid("principal", "Enter a valid loan amount (0 or higher)."));
        }
        if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
            return Err(CalcError::invalid(
                "annual_rate",
                "Enter a valid interest rate (0 or higher).",
            ));
        }
        let num_periods = periods_for_term(term_years, periods_per_year)?;

        Ok(Self {
            principal,
            annual_rate_percent,
            periods_per_year,
            num_periods,
        })
    }

    pub fn periodic_rate(&self) -> f64 {
        to_periodic_rate(self.annual_rate_percent, self.periods_per_year)
    }

    /// Level payment per period
    pub fn payment(&self) -> Result<f64, CalcError> {
        payment_for_loan(self.principal, self.periodic_rate(), self.num_periods)
    }

    /// Interest paid over the full term at the level payment
    pub fn total_interest(&self) -> Result<f64, CalcError> {
        let payment = self.payment()?;
        ensure_finite("total interest", payment * self.num_periods as f64 - self.principal)
    }
}

/// Aggregate view of an accumulating annuity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnuityResult {
    pub payment: f64,
    pub future_value: f64,
    /// Sum of periodic payments, excluding the present value
    pub total_contributions: f64,
    /// `future_value - total_contributions - present_value`
    pub interest_component: f64,
}

impl AnnuityResult {
    /// Grow `present_value` and `payment` contributions over `n` periods
    pub fn accumulate(
        present_value: f64,
        payment: f64,
        rate: f64,
        n: u32,
        timing: PaymentTiming,
    ) -> Result<Self, CalcError> {
        let future_value = future_value_of_annuity(present_value, payment, rate, n, timing)?;
        let total_contributions = ensure_finite("total contributions", payment * n as f64)?;

        Ok(Self {
            payment,
            future_value,
            total_contributions,
            interest_component: future_value - total_contributions - present_value,
        })
    }
}

fn check_inputs(values: &[(&str, f64)], rate: f64, n: u32) -> Result<(), CalcError> {
    if n == 0 {
        return Err(CalcError::invalid(
            "num_periods",
            "Enter a valid number of periods greater than 0.",
        ));
    }
    if !rate.is_finite() || rate < 0.0 {
        return Err(CalcError::invalid("rate", "Enter a valid interest rate (0 or higher)."));
    }
    for (name, value) in values {
        if !value.is_finite() {
            return Err(CalcError::invalid(name, format!("Enter a valid {}.", name.replace('_', " "))));
        }
    }
    Ok(())
}

/// `(1 + r)^n`, computed through `ln_1p` to keep precision for tiny rates
fn growth_factor(rate: f64, n: u32) -> f64 {
    (n as f64 * rate.ln_1p()).exp()
}

/// `(1 + r)^n - 1` without cancellation
fn growth_minus_one(rate: f64, n: u32) -> f64 {
    (n as f64 * rate.ln_1p()).exp_m1()
}

/// `1 - (1 + r)^-n` without cancellation
fn discount_complement(rate: f64, n: u32) -> f64 {
    -(-(n as f64) * rate.ln_1p()).exp_m1()
}

/// Level payment that amortizes `principal` over `n` periods at periodic rate `rate`.
///
/// `payment = P × r / (1 − (1 + r)^−n)`, or `P / n` at a zero rate.
pub fn payment_for_loan(principal: f64, rate: f64, n: u32) -> Result<f64, CalcError> {
    check_inputs(&[("principal", principal)], rate, n)?;

    let payment = if rate == 0.0 {
        principal / n as f64
    } else {
        principal * rate / discount_complement(rate, n)
    };

    ensure_finite("payment", payment)
}

/// Future value of a lump sum plus level contributions.
///
/// Lump sum grows as `PV × (1 + r)^n`; contributions as `PMT × ((1 + r)^n − 1) / r`
/// (or `PMT × n` at a zero rate), times `(1 + r)` when paid at the start of each period.
pub fn future_value_of_annuity(
    present_value: f64,
    payment: f64,
    rate: f64,
    n: u32,
    timing: PaymentTiming,
) -> Result<f64, CalcError> {
    check_inputs(&[("present_value", present_value), ("payment", payment)], rate, n)?;

    if rate == 0.0 {
        return ensure_finite("future value", present_value + payment * n as f64);
    }

    let lump = if present_value == 0.0 {
        0.0
    } else {
        present_value * growth_factor(rate, n)
    };
    let mut contributions = if payment == 0.0 {
        0.0
    } else {
        payment * growth_minus_one(rate, n) / rate
    };
    if timing == PaymentTiming::Start {
        contributions *= 1.0 + rate;
    }

    ensure_finite("future value", lump + contributions)
}

/// Lump sum compounded over a possibly fractional number of periods: `PV × (1 + r)^t`.
pub fn compound_lump_sum(present_value: f64, rate: f64, periods: f64) -> Result<f64, CalcError> {
    if !periods.is_finite() || periods < 0.0 {
        return Err(CalcError::invalid("periods", "Enter a valid term."));
    }
    if rate == 0.0 || present_value == 0.0 {
        return ensure_finite("future value", present_value);
    }
    if !rate.is_finite() || rate < 0.0 {
        return Err(CalcError::invalid("rate", "Enter a valid interest rate (0 or higher)."));
    }

    ensure_finite("future value", present_value * (periods * rate.ln_1p()).exp())
}

/// Principal that a level payment retires over `n` periods.
///
/// `P = PMT × (1 − (1 + r)^−n) / r`, or `PMT × n` at a zero rate.
pub fn principal_for_payment(payment: f64, rate: f64, n: u32) -> Result<f64, CalcError> {
    check_inputs(&[("payment", payment)], rate, n)?;

    let principal = if rate == 0.0 {
        payment * n as f64
    } else {
        payment * discount_complement(rate, n) / rate
    };

    ensure_finite("principal", principal)
}

/// Level contribution needed for `present_value` to reach `target` in `n` periods.
///
/// Returns 0 when the lump sum alone already reaches the target.
pub fn contribution_for_goal(
    target: f64,
    present_value: f64,
    rate: f64,
    n: u32,
    timing: PaymentTiming,
) -> Result<f64, CalcError> {
    check_inputs(&[("target", target), ("present_value", present_value)], rate, n)?;

    if rate == 0.0 {
        return ensure_finite("contribution", ((target - present_value) / n as f64).max(0.0));
    }

    let grown = present_value * growth_factor(rate, n);
    if grown >= target {
        return Ok(0.0);
    }

    let mut contribution = (target - grown) * rate / growth_minus_one(rate, n);
    if timing == PaymentTiming::Start {
        contribution /= 1.0 + rate;
    }

    ensure_finite("contribution", contribution.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_rate_payment_is_exact_division() {
        for &(p, n) in &[(1000.0, 12_u32), (20000.0, 48), (1.0, 7), (99_999.99, 360)] {
            assert_eq!(payment_for_loan(p, 0.0, n).unwrap(), p / n as f64);
        }
    }

    #[test]
    fn test_round_trip_principal() {
        for &r in &[0.0, 0.0001, 0.005, 0.01, 0.05] {
            for &n in &[1_u32, 12, 48, 360] {
                let p = 25_000.0;
                let pmt = payment_for_loan(p, r, n).unwrap();
                let back = principal_for_payment(pmt, r, n).unwrap();
                assert_relative_eq!(back, p, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn test_payment_increases_with_rate() {
        let mut previous = payment_for_loan(10_000.0, 0.0, 60).unwrap();
        for annual in [1.0, 2.5, 5.0, 7.5, 12.0, 24.0] {
            let payment = payment_for_loan(10_000.0, to_periodic_rate(annual, 12), 60).unwrap();
            assert!(payment > previous, "payment at {}% should exceed {}", annual, previous);
            previous = payment;
        }
    }

    #[test]
    fn test_future_value_without_contributions_is_lump_growth() {
        let fv = future_value_of_annuity(5_000.0, 0.0, 0.004, 120, PaymentTiming::End).unwrap();
        assert_relative_eq!(fv, 5_000.0 * 1.004_f64.powi(120), max_relative = 1e-12);
    }

    #[test]
    fn test_single_period_is_simple_interest() {
        let payment = payment_for_loan(1_000.0, 0.01, 1).unwrap();
        assert_relative_eq!(payment, 1_010.0, max_relative = 1e-12);
    }

    #[test]
    fn test_loan_affordability_scenario() {
        let terms = LoanTerms::new(20_000.0, 6.0, 4.0, 12).unwrap();
        assert_eq!(terms.num_periods, 48);
        let payment = terms.payment().unwrap();
        assert!((payment - 469.70).abs() < 0.005, "got {}", payment);
    }

    #[test]
    fn test_savings_goal_zero_rate_scenario() {
        let contribution =
            contribution_for_goal(12_000.0, 2_000.0, 0.0, 24, PaymentTiming::End).unwrap();
        assert!((contribution - 416.67).abs() < 0.005);
    }

    #[test]
    fn test_goal_already_met_needs_no_contribution() {
        let contribution =
            contribution_for_goal(10_000.0, 9_800.0, 0.01, 12, PaymentTiming::End).unwrap();
        assert_eq!(contribution, 0.0);

        let contribution =
            contribution_for_goal(1_000.0, 2_000.0, 0.0, 12, PaymentTiming::End).unwrap();
        assert_eq!(contribution, 0.0);
    }

    #[test]
    fn test_goal_contribution_reaches_target() {
        for timing in [PaymentTiming::End, PaymentTiming::Start] {
            let pmt = contribution_for_goal(50_000.0, 5_000.0, 0.004, 60, timing).unwrap();
            let fv = future_value_of_annuity(5_000.0, pmt, 0.004, 60, timing).unwrap();
            assert_relative_eq!(fv, 50_000.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_annuity_due_exceeds_ordinary() {
        let end = future_value_of_annuity(0.0, 100.0, 0.005, 24, PaymentTiming::End).unwrap();
        let start = future_value_of_annuity(0.0, 100.0, 0.005, 24, PaymentTiming::Start).unwrap();
        assert_relative_eq!(start, end * 1.005, max_relative = 1e-12);
    }

    #[test]
    fn test_accumulate_interest_identity() {
        let result = AnnuityResult::accumulate(1_000.0, 200.0, 0.006, 36, PaymentTiming::End).unwrap();
        assert_eq!(result.total_contributions, 7_200.0);
        assert_eq!(
            result.interest_component,
            result.future_value - result.total_contributions - 1_000.0
        );
        assert!(result.interest_component > 0.0);

        let flat = AnnuityResult::accumulate(1_000.0, 200.0, 0.0, 36, PaymentTiming::Start).unwrap();
        assert_eq!(flat.future_value, 8_200.0);
        assert_eq!(flat.interest_component, 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            payment_for_loan(1_000.0, 0.01, 0),
            Err(CalcError::InvalidInput { .. })
        ));
        assert!(matches!(
            payment_for_loan(f64::NAN, 0.01, 12),
            Err(CalcError::InvalidInput { .. })
        ));
        assert!(principal_for_payment(100.0, f64::INFINITY, 12).is_err());
        assert!(future_value_of_annuity(0.0, 100.0, -0.01, 12, PaymentTiming::End).is_err());
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = future_value_of_annuity(1e300, 0.0, 5.0, 10_000, PaymentTiming::End).unwrap_err();
        assert!(matches!(err, CalcError::ComputationOverflow { .. }));
    }

    #[test]
    fn test_lump_sum_fractional_periods() {
        let grown = compound_lump_sum(1_000.0, 0.1, 2.5).unwrap();
        assert_relative_eq!(grown, 1_000.0 * 1.1_f64.powf(2.5), max_relative = 1e-12);

        assert_eq!(compound_lump_sum(1_000.0, 0.0, 2.5).unwrap(), 1_000.0);
        assert_eq!(
            compound_lump_sum(1_000.0, 0.1, 2.0).unwrap(),
            future_value_of_annuity(1_000.0, 0.0, 0.1, 2, PaymentTiming::End).unwrap()
        );
        assert!(compound_lump_sum(1_000.0, 0.1, f64::NAN).is_err());
    }

    #[test]
    fn test_timing_parse() {
        assert_eq!("start".parse::<PaymentTiming>().unwrap(), PaymentTiming::Start);
        assert_eq!(" End ".parse::<PaymentTiming>().unwrap(), PaymentTiming::End);
        assert!("middle".parse::<PaymentTiming>().is_err());
    }
}
