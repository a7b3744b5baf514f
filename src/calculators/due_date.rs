//! Pregnancy due date and milestones from the last menstrual period (LMP)

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;

use super::Calculator;
use crate::error::CalcError;
use crate::guardrails::Guardrails;
use crate::input::{Field, FormFields};
use crate::outcome::{ResultBuilder, ResultLine};

const LMP: Field = Field::new("lmp_date", "LMP date");
const CYCLE: Field = Field::new("cycle_length_days", "cycle length");
const AS_OF: Field = Field::new("as_of", "reference date");

/// Cycle length the 280-day rule assumes
const STANDARD_CYCLE_DAYS: i64 = 28;
const PREGNANCY_DAYS: i64 = 280;

/// Dates derived from one LMP and cycle length, relative to `as_of`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PregnancyTimeline {
    pub lmp: NaiveDate,
    pub as_of: NaiveDate,
    pub cycle_length_days: i64,
    pub due_date: NaiveDate,
    /// Days since LMP, shifted by the cycle adjustment and floored at 0
    pub gestational_days: i64,
    /// Negative once the due date has passed
    pub days_to_due_date: i64,
    pub estimated_conception: NaiveDate,
    pub first_trimester_ends: NaiveDate,
    pub second_trimester_starts: NaiveDate,
    pub third_trimester_starts: NaiveDate,
    pub scan_window: (NaiveDate, NaiveDate),
}

impl PregnancyTimeline {
    pub fn new(lmp: NaiveDate, cycle_length_days: i64, as_of: NaiveDate) -> Result<Self, CalcError> {
        let days_since_lmp = (as_of - lmp).num_days();
        if days_since_lmp < 0 {
            return Err(CalcError::inconsistent(
                "Your LMP date cannot be in the future. Enter a past date.",
            ));
        }

        let adjustment = cycle_length_days
            .checked_sub(STANDARD_CYCLE_DAYS)
            .ok_or_else(|| CalcError::overflow("due date"))?;
        let shifted = |days: i64| -> Result<NaiveDate, CalcError> {
            days.checked_add(adjustment)
                .and_then(Duration::try_days)
                .and_then(|offset| lmp.checked_add_signed(offset))
                .ok_or_else(|| CalcError::overflow("due date"))
        };

        let due_date = shifted(PREGNANCY_DAYS)?;

        Ok(Self {
            lmp,
            as_of,
            cycle_length_days,
            due_date,
            gestational_days: days_since_lmp.saturating_sub(adjustment).max(0),
            days_to_due_date: (due_date - as_of).num_days(),
            estimated_conception: shifted(14)?,
            first_trimester_ends: shifted(13 * 7 + 6)?,
            second_trimester_starts: shifted(14 * 7)?,
            third_trimester_starts: shifted(28 * 7)?,
            scan_window: (shifted(11 * 7)?, shifted(13 * 7 + 6)?),
        })
    }

    pub fn gestational_weeks(&self) -> (i64, i64) {
        (self.gestational_days / 7, self.gestational_days % 7)
    }

    pub fn trimester(&self) -> &'static str {
        match self.gestational_weeks().0 {
            w if w < 14 => "First trimester",
            w if w < 28 => "Second trimester",
            _ => "Third trimester",
        }
    }

    pub fn countdown(&self) -> String {
        if self.days_to_due_date >= 0 {
            format!("{} days remaining (estimate)", self.days_to_due_date)
        } else {
            format!("{} days past the estimate", -self.days_to_due_date)
        }
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub struct DueDate;

impl Calculator for DueDate {
    fn title(&self) -> &'static str {
        "Due Date Calculator"
    }

    fn calculate(
        &self,
        fields: &FormFields,
        guardrails: &Guardrails,
    ) -> Result<Vec<ResultLine>, CalcError> {
        let lmp = fields.date(LMP)?;
        let as_of = fields
            .optional_date(AS_OF)?
            .unwrap_or_else(|| Local::now().date_naive());

        // Future LMP is reported before the cycle length is looked at
        if lmp > as_of {
            return Err(CalcError::inconsistent(
                "Your LMP date cannot be in the future. Enter a past date.",
            ));
        }

        let guards = &guardrails.due_date;
        let cycle_length = if fields.is_filled(CYCLE) {
            let unrealistic = || {
                let message = match guards.cycle_length_range {
                    Some(window) => format!(
                        "Enter a realistic cycle length between {} and {} days, or leave it blank.",
                        window.min, window.max
                    ),
                    None => "Enter a valid cycle length in days, or leave it blank.".to_string(),
                };
                CalcError::out_of_range(CYCLE.key, message)
            };
            let days = fields
                .optional_number(CYCLE)
                .filter(|v| *v > 0.0)
                .ok_or_else(unrealistic)?;
            if let Some(window) = guards.cycle_length_range {
                if !window.contains(days) {
                    return Err(unrealistic());
                }
            }
            let days = days.round();
            if days >= i64::MAX as f64 {
                return Err(CalcError::overflow("due date"));
            }
            days as i64
        } else {
            i64::from(guards.default_cycle_length)
        };

        let timeline = PregnancyTimeline::new(lmp, cycle_length, as_of)?;
        let (weeks, days) = timeline.gestational_weeks();
        let (scan_start, scan_end) = timeline.scan_window;

        Ok(ResultBuilder::new()
            .text("Estimated due date", iso(timeline.due_date))
            .text(
                "Based on",
                format!("LMP and a {}-day cycle.", timeline.cycle_length_days),
            )
            .text(
                "Gestational age today",
                format!("{} weeks {} days ({})", weeks, days, timeline.trimester()),
            )
            .text("Countdown", timeline.countdown())
            .text("Estimated conception", iso(timeline.estimated_conception))
            .text("First trimester ends", iso(timeline.first_trimester_ends))
            .text("Second trimester starts", iso(timeline.second_trimester_starts))
            .text("Third trimester starts", iso(timeline.third_trimester_starts))
            .text(
                "12-week scan window",
                format!("{} to {}", iso(scan_start), iso(scan_end)),
            )
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::CalculationOutcome;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn form(cycle: &str) -> FormFields {
        FormFields::from_pairs([
            ("lmp_date", "2024-01-01"),
            ("cycle_length_days", cycle),
            ("as_of", "2024-03-01"),
        ])
    }

    fn run(fields: &FormFields) -> CalculationOutcome {
        CalculationOutcome::from_result(DueDate.calculate(fields, &Guardrails::default()))
    }

    #[test]
    fn test_standard_cycle() {
        let outcome = run(&form(""));
        assert_eq!(outcome.value("Estimated due date"), Some("2024-10-07"));
        assert_eq!(outcome.value("Based on"), Some("LMP and a 28-day cycle."));
        assert_eq!(
            outcome.value("Gestational age today"),
            Some("8 weeks 4 days (First trimester)")
        );
        assert_eq!(outcome.value("Countdown"), Some("220 days remaining (estimate)"));
        assert_eq!(outcome.value("Estimated conception"), Some("2024-01-15"));
        assert_eq!(outcome.value("Second trimester starts"), Some("2024-04-08"));
        assert_eq!(outcome.value("Third trimester starts"), Some("2024-07-15"));
        assert_eq!(outcome.value("12-week scan window"), Some("2024-03-18 to 2024-04-07"));
    }

    #[test]
    fn test_longer_cycle_shifts_dates() {
        let outcome = run(&form("30"));
        assert_eq!(outcome.value("Estimated due date"), Some("2024-10-09"));
        assert_eq!(outcome.value("Estimated conception"), Some("2024-01-17"));
        assert_eq!(
            outcome.value("Gestational age today"),
            Some("8 weeks 2 days (First trimester)")
        );
    }

    #[test]
    fn test_past_due() {
        let timeline = PregnancyTimeline::new(date(2024, 1, 1), 28, date(2024, 10, 10)).unwrap();
        assert_eq!(timeline.countdown(), "3 days past the estimate");
        assert_eq!(timeline.trimester(), "Third trimester");
    }

    #[test]
    fn test_future_lmp() {
        let fields = form("").with("as_of", "2023-12-31");
        assert_eq!(
            run(&fields).message(),
            Some("Your LMP date cannot be in the future. Enter a past date.")
        );
    }

    #[test]
    fn test_unrealistic_cycle() {
        for cycle in ["19", "46", "abc"] {
            assert_eq!(
                run(&form(cycle)).message(),
                Some("Enter a realistic cycle length between 20 and 45 days, or leave it blank.")
            );
        }
    }

    #[test]
    fn test_huge_cycle_without_guardrail() {
        let mut guardrails = Guardrails::default();
        guardrails.due_date.cycle_length_range = None;
        for cycle in ["1e15", "1e300"] {
            let outcome =
                CalculationOutcome::from_result(DueDate.calculate(&form(cycle), &guardrails));
            assert_eq!(
                outcome.message(),
                Some("The due date is too large to display. Try smaller values.")
            );
        }

        let outcome = CalculationOutcome::from_result(DueDate.calculate(&form("60"), &guardrails));
        assert_eq!(outcome.value("Estimated due date"), Some("2024-11-08"));
    }

    #[test]
    fn test_extreme_cycle_lengths_do_not_panic() {
        for cycle in [i64::MAX, i64::MIN, 1_000_000_000_000_000] {
            let err = PregnancyTimeline::new(date(2024, 1, 1), cycle, date(2024, 3, 1)).unwrap_err();
            assert_eq!(err, CalcError::overflow("due date"));
        }
    }

    #[test]
    fn test_bad_lmp_format() {
        let fields = FormFields::from_pairs([("lmp_date", "01/01/2024")]);
        assert_eq!(
            run(&fields).message(),
            Some("Enter a valid LMP date in YYYY-MM-DD format.")
        );
    }
}
