//! Annuity and amortization math shared by the loan and savings calculators

mod annuity;
mod rate;
mod schedule;

pub use annuity::{
    compound_lump_sum, contribution_for_goal, future_value_of_annuity, payment_for_loan,
    principal_for_payment, AnnuityResult, LoanTerms, PaymentTiming,
};
pub use rate::{effective_periodic_rate, periods_for_term, to_periodic_rate, Frequency};
pub use schedule::{AmortizationRow, AmortizationSchedule, ScheduleSummary, MAX_SCHEDULE_PERIODS};
