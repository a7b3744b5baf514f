//! What a better APR after a credit score improvement does to a loan's cost

use std::str::FromStr;

use super::Calculator;
use crate::error::CalcError;
use crate::finance::LoanTerms;
use crate::guardrails::Guardrails;
use crate::input::{Bounds, Field, FormFields};
use crate::outcome::{format_two_decimals, ResultBuilder, ResultLine};

const LOAN: Field = Field::new("loan_amount", "loan amount");
const TERM: Field = Field::new("term_months", "loan term (months)");
const CURRENT_APR: Field = Field::new("current_apr", "current APR");
const MODE: Field = Field::new("mode", "calculation mode");
const IMPROVED_APR: Field = Field::new("improved_apr", "improved APR");
const RATE_DROP: Field = Field::new("rate_drop_points", "estimated rate drop");
const SCORE_INCREASE: Field = Field::new("score_increase", "expected score increase");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeSelect {
    Known,
    Estimate,
}

impl FromStr for ModeSelect {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "known" => Ok(ModeSelect::Known),
            "estimate" => Ok(ModeSelect::Estimate),
            _ => Err(()),
        }
    }
}

/// Where the improved APR comes from
#[derive(Debug, Clone, Copy, PartialEq)]
enum ImprovedRate {
    Known { apr: f64 },
    Estimate { rate_drop: f64, score_increase: Option<f64> },
}

impl ImprovedRate {
    fn resolve(&self, current_apr: f64) -> f64 {
        match self {
            ImprovedRate::Known { apr } => *apr,
            ImprovedRate::Estimate { rate_drop, .. } => (current_apr - rate_drop).max(0.0),
        }
    }
}

pub struct CreditScoreImpact;

impl Calculator for CreditScoreImpact {
    fn title(&self) -> &'static str {
        "Credit Score Improvement Impact Calculator"
    }

    fn calculate(
        &self,
        fields: &FormFields,
        _guardrails: &Guardrails,
    ) -> Result<Vec<ResultLine>, CalcError> {
        fields.require(&[LOAN, TERM, CURRENT_APR])?;
        let mode = fields.choice(MODE, Some(ModeSelect::Known))?;

        let principal = fields.number(LOAN, &Bounds::positive())?;
        let months = fields.number(TERM, &Bounds::positive())?;
        if months.fract() != 0.0 {
            return Err(CalcError::invalid(
                TERM.key,
                "Loan term must be a whole number of months.",
            ));
        }
        let current_apr = fields.number(CURRENT_APR, &Bounds::non_negative())?;

        let improved = match mode {
            ModeSelect::Known => {
                fields.require(&[IMPROVED_APR])?;
                ImprovedRate::Known {
                    apr: fields.number(IMPROVED_APR, &Bounds::non_negative())?,
                }
            }
            ModeSelect::Estimate => {
                fields.require(&[RATE_DROP])?;
                ImprovedRate::Estimate {
                    rate_drop: fields.number(RATE_DROP, &Bounds::non_negative())?,
                    score_increase: fields.optional_number(SCORE_INCREASE).filter(|v| *v > 0.0),
                }
            }
        };
        let improved_apr = improved.resolve(current_apr);

        let current = LoanTerms::new(principal, current_apr, months / 12.0, 12)?;
        let better = LoanTerms::new(principal, improved_apr, months / 12.0, 12)?;

        let current_payment = current.payment()?;
        let improved_payment = better.payment()?;
        let current_interest = current.total_interest()?;
        let improved_interest = better.total_interest()?;

        let mut notes = Vec::new();
        match improved {
            ImprovedRate::Estimate { score_increase, .. } => {
                if let Some(points) = score_increase {
                    notes.push(format!(
                        "You noted an expected score increase of {} points.",
                        points.round()
                    ));
                }
                notes.push("Improved APR was estimated using your rate drop input.".to_string());
            }
            ImprovedRate::Known { .. } => {
                notes.push("Improved APR was taken directly from your input.".to_string());
            }
        }
        if improved_apr > current_apr {
            notes.push(
                "Your improved APR is higher than your current APR, so the result shows higher costs instead of savings."
                    .to_string(),
            );
        }

        Ok(ResultBuilder::new()
            .amount("Current monthly payment", current_payment, "")?
            .amount("Improved monthly payment", improved_payment, "")?
            .amount("Monthly difference", current_payment - improved_payment, "")?
            .amount("Total interest (current)", current_interest, "")?
            .amount("Total interest (improved)", improved_interest, "")?
            .amount("Total interest saved", current_interest - improved_interest, "")?
            .text(
                "Rates used",
                format!(
                    "{}% APR → {}% APR",
                    format_two_decimals(current_apr),
                    format_two_decimals(improved_apr)
                ),
            )
            .text("Assumptions used", notes.join(" "))
            .build())
    }
}
