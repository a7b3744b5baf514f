//! Month-by-month amortization with optional extra principal

use serde::{Deserialize, Serialize};

use super::annuity::{payment_for_loan, LoanTerms};
use crate::error::{ensure_finite, CalcError};

/// Hard stop for schedules that would otherwise never retire the balance
pub const MAX_SCHEDULE_PERIODS: u32 = 5000;

/// A single period of an amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub payment: f64,
    pub interest: f64,
    /// Scheduled principal portion of the level payment
    pub principal: f64,
    /// Extra principal actually applied this period
    pub extra: f64,
    pub balance: f64,
}

/// Full schedule plus the no-extra baseline it is compared against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub terms: LoanTerms,
    pub scheduled_payment: f64,
    pub extra_payment: f64,
    pub rows: Vec<AmortizationRow>,
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSummary {
    pub periods: u32,
    pub total_paid: f64,
    pub total_interest: f64,
    /// Interest the loan would cost without extra payments
    pub baseline_interest: f64,
    pub interest_saved: f64,
    pub periods_saved: u32,
}

impl AmortizationSchedule {
    /// Build the schedule for `terms`, adding `extra_payment` to principal each period
    pub fn build(terms: LoanTerms, extra_payment: f64) -> Result<Self, CalcError> {
        if !extra_payment.is_finite() || extra_payment < 0.0 {
            return Err(CalcError::invalid(
                "extra_payment",
                "Enter a valid extra monthly payment (0 or higher).",
            ));
        }

        let rate = terms.periodic_rate();
        let scheduled_payment = payment_for_loan(terms.principal, rate, terms.num_periods)?;
        if scheduled_payment <= 0.0 {
            return Err(CalcError::inconsistent(
                "Could not calculate a valid payment. Check your inputs.",
            ));
        }
        if rate > 0.0 && scheduled_payment <= terms.principal * rate {
            return Err(CalcError::inconsistent(
                "Your payment does not cover the periodic interest at this rate. Check the APR and term.",
            ));
        }

        let mut rows = Vec::with_capacity(terms.num_periods as usize);
        let mut balance = terms.principal;
        let mut period = 0;
        let dust = terms.principal * 1e-9 + 1e-9;

        while balance > 0.0 {
            if period >= MAX_SCHEDULE_PERIODS {
                return Err(CalcError::inconsistent(
                    "Calculation did not converge. Check inputs (rate, term, and extra payment).",
                ));
            }
            period += 1;

            let interest = if rate == 0.0 { 0.0 } else { balance * rate };
            let principal = (scheduled_payment - interest).max(0.0);
            let mut extra = extra_payment;
            let mut reduction = principal + extra;
            let payment = if reduction > balance {
                // Final period: pay off exactly what is left
                reduction = balance;
                extra = (reduction - principal).max(0.0);
                interest + reduction
            } else {
                scheduled_payment + extra
            };

            balance -= reduction;
            // Absorb floating dust left after the last full payment
            if balance < dust {
                balance = 0.0;
            }

            rows.push(AmortizationRow {
                period,
                payment,
                interest,
                principal,
                extra,
                balance,
            });
        }

        Ok(Self {
            terms,
            scheduled_payment,
            extra_payment,
            rows,
        })
    }

    pub fn summary(&self) -> Result<ScheduleSummary, CalcError> {
        let total_paid: f64 = self.rows.iter().map(|r| r.payment).sum();
        let total_interest: f64 = self.rows.iter().map(|r| r.interest).sum();
        let baseline_interest =
            self.scheduled_payment * self.terms.num_periods as f64 - self.terms.principal;
        let periods = self.rows.len() as u32;

        Ok(ScheduleSummary {
            periods,
            total_paid: ensure_finite("total paid", total_paid)?,
            total_interest: ensure_finite("total interest", total_interest)?,
            baseline_interest: ensure_finite("baseline interest", baseline_interest)?,
            interest_saved: (baseline_interest - total_interest).max(0.0),
            periods_saved: self.terms.num_periods.saturating_sub(periods),
        })
    }
}
