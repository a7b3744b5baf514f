//! Annual-to-periodic rate conversion

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// Payment or compounding frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    BiWeekly,
    Weekly,
    Daily,
}

impl Frequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annually => 1,
            Frequency::SemiAnnually => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::BiWeekly => 26,
            Frequency::Weekly => 52,
            Frequency::Daily => 365,
        }
    }

    pub fn from_periods(periods_per_year: u32) -> Option<Self> {
        match periods_per_year {
            1 => Some(Frequency::Annually),
            2 => Some(Frequency::SemiAnnually),
            4 => Some(Frequency::Quarterly),
            12 => Some(Frequency::Monthly),
            26 => Some(Frequency::BiWeekly),
            52 => Some(Frequency::Weekly),
            365 => Some(Frequency::Daily),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Annually => "yearly",
            Frequency::SemiAnnually => "semi-annually",
            Frequency::Quarterly => "quarterly",
            Frequency::Monthly => "monthly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Weekly => "weekly",
            Frequency::Daily => "daily",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = String;

    /// Accepts the numeric select values ("12") as well as names ("monthly")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if let Ok(n) = lowered.parse::<f64>() {
            if n.fract() == 0.0 && n > 0.0 && n <= u32::MAX as f64 {
                if let Some(freq) = Frequency::from_periods(n as u32) {
                    return Ok(freq);
                }
            }
            return Err(format!("Unsupported frequency: {}", s));
        }

        match lowered.as_str() {
            "annually" | "annual" | "yearly" => Ok(Frequency::Annually),
            "semi-annually" | "semiannually" | "semi-annual" => Ok(Frequency::SemiAnnually),
            "quarterly" => Ok(Frequency::Quarterly),
            "monthly" => Ok(Frequency::Monthly),
            "bi-weekly" | "biweekly" | "fortnightly" => Ok(Frequency::BiWeekly),
            "weekly" => Ok(Frequency::Weekly),
            "daily" => Ok(Frequency::Daily),
            other => Err(format!("Unsupported frequency: {}", other)),
        }
    }
}

/// Nominal annual percentage divided evenly across the periods of a year.
///
/// A zero annual rate returns exactly `0.0`.
pub fn to_periodic_rate(annual_rate_percent: f64, periods_per_year: u32) -> f64 {
    if annual_rate_percent == 0.0 || periods_per_year == 0 {
        return 0.0;
    }
    (annual_rate_percent / 100.0) / periods_per_year as f64
}

/// Rate per payment period for a nominal rate compounded at a different frequency.
///
/// `i = (1 + a/m)^(m/n) - 1`; falls back to simple division when the compounding and
/// payment frequencies match, and is exactly `0.0` for a zero annual rate.
pub fn effective_periodic_rate(
    annual_rate_percent: f64,
    compounds_per_year: u32,
    payments_per_year: u32,
) -> f64 {
    if annual_rate_percent == 0.0 || compounds_per_year == 0 || payments_per_year == 0 {
        return 0.0;
    }
    if compounds_per_year == payments_per_year {
        return to_periodic_rate(annual_rate_percent, payments_per_year);
    }

    let m = compounds_per_year as f64;
    let n = payments_per_year as f64;
    (1.0 + annual_rate_percent / 100.0 / m).powf(m / n) - 1.0
}

/// Number of whole periods in a term, rounded to nearest and never below one
pub fn periods_for_term(term_years: f64, periods_per_year: u32) -> Result<u32, CalcError> {
    if !term_years.is_finite() || term_years <= 0.0 || periods_per_year == 0 {
        return Err(CalcError::invalid("term_years", "Enter a valid term."));
    }

    let periods = (term_years * periods_per_year as f64).round();
    if periods > u32::MAX as f64 {
        return Err(CalcError::invalid("term_years", "Enter a valid term."));
    }

    Ok((periods as u32).max(1))
}
