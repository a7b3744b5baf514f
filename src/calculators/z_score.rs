//! Standard score, percentile rank and a plain-language band

use super::Calculator;
use crate::error::CalcError;
use crate::guardrails::Guardrails;
use crate::input::{check_range, Bounds, Field, FormFields};
use crate::outcome::{format_two_decimals, ResultBuilder, ResultLine};

const RAW: Field = Field::new("raw_score", "score");
const MEAN: Field = Field::new("mean_score", "mean (average) score");
const STD_DEV: Field = Field::new("std_dev", "standard deviation (SD)");
const GROUP: Field = Field::new("group_size", "group size");

/// Standard normal CDF via the Abramowitz–Stegun 7.1.26 erf approximation
///
/// Absolute error is below 1.5e-7 across the real line.
pub fn normal_cdf(z: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if z < 0.0 { -1.0 } else { 1.0 };
    let x = z.abs() / std::f64::consts::SQRT_2;
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    let erf = 1.0 - poly * (-x * x).exp();

    0.5 * (1.0 + sign * erf)
}

fn band(abs_z: f64) -> &'static str {
    match abs_z {
        z if z < 0.5 => "very close to average",
        z if z < 1.0 => "slightly away from average",
        z if z < 2.0 => "notably away from average",
        z if z < 3.0 => "far from average",
        _ => "extremely far from average",
    }
}

pub struct ZScore;

impl Calculator for ZScore {
    fn title(&self) -> &'static str {
        "Standard Score (Z-Score) Calculator"
    }

    fn calculate(
        &self,
        fields: &FormFields,
        _guardrails: &Guardrails,
    ) -> Result<Vec<ResultLine>, CalcError> {
        fields.require(&[RAW, MEAN, STD_DEV])?;

        let raw = fields.number(RAW, &Bounds::unbounded())?;
        let mean = fields.number(MEAN, &Bounds::unbounded())?;
        let std_dev = fields.number(STD_DEV, &Bounds::positive())?;

        let group_size = if fields.is_filled(GROUP) {
            let invalid = || {
                CalcError::invalid(
                    GROUP.key,
                    "Enter a valid group size as a whole number of 2 or more (or leave it blank).",
                )
            };
            let size = fields.optional_number(GROUP).ok_or_else(invalid)?;
            if size.fract() != 0.0 || size < 2.0 {
                return Err(invalid());
            }
            Some(check_range(size, &Bounds::between(2.0, u32::MAX as f64), GROUP)?)
        } else {
            None
        };

        let diff = raw - mean;
        let z = diff / std_dev;
        let percentile = (normal_cdf(z) * 100.0).clamp(0.0, 100.0);

        let direction = if z > 0.0 {
            "above"
        } else if z < 0.0 {
            "below"
        } else {
            "equal to"
        };

        let mut builder = ResultBuilder::new()
            .amount("Z-score (standard score)", z, "")?
            .text(
                "Estimated percentile rank",
                format!(
                    "{:.1}% (assumes an approximately normal score distribution)",
                    percentile
                ),
            )
            .text(
                "How to read this",
                format!(
                    "Your score is {} standard deviations {} the mean. That is {} for this group.",
                    format_two_decimals(z.abs()),
                    direction,
                    band(z.abs())
                ),
            )
            .amount("Raw difference from the mean", diff, "points")?;

        if let Some(size) = group_size {
            let below = (percentile / 100.0 * size).round();
            let at_or_above = (size - below).max(0.0);
            builder = builder.text(
                &format!("Estimated in a group of {}", size),
                format!(
                    "about {} below you and about {} at or above you.",
                    below, at_or_above
                ),
            );
        }

        Ok(builder.build())
    }
}
