//! Calculator registry
//!
//! Every calculator is a pure function of its form fields and the guardrails in
//! effect. `CalculatorKind` names them on the wire and in the CLI.

mod amortization_schedule;
mod asphalt_volume;
mod credit_score_impact;
mod due_date;
mod future_value;
mod hydraulic_force;
mod loan_affordability;
mod route_distance;
mod savings_goal;
mod z_score;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::guardrails::Guardrails;
use crate::input::FormFields;
use crate::outcome::ResultLine;

pub use amortization_schedule::AmortizationScheduleCalculator;
pub use asphalt_volume::{AsphaltEstimate, AsphaltVolume};
pub use credit_score_impact::CreditScoreImpact;
pub use due_date::{DueDate, PregnancyTimeline};
pub use future_value::FutureValue;
pub use hydraulic_force::{CylinderForces, HydraulicForce};
pub use loan_affordability::LoanAffordability;
pub use route_distance::{haversine_km, RouteDistance, EARTH_RADIUS_KM};
pub use savings_goal::SavingsGoal;
pub use z_score::{normal_cdf, ZScore};

/// A single closed-form calculator
///
/// Implementations validate fields in a fixed order and stop at the first failure.
pub trait Calculator: Send + Sync {
    /// Human-readable name
    fn title(&self) -> &'static str;

    /// Validate `fields` and compute the ordered result lines
    fn calculate(
        &self,
        fields: &FormFields,
        guardrails: &Guardrails,
    ) -> Result<Vec<ResultLine>, CalcError>;
}

/// Every calculator the crate ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculatorKind {
    LoanAffordability,
    SavingsGoal,
    FutureValue,
    CreditScoreImpact,
    AmortizationSchedule,
    AsphaltVolume,
    HydraulicForce,
    ZScore,
    RouteDistance,
    DueDate,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 10] = [
        CalculatorKind::LoanAffordability,
        CalculatorKind::SavingsGoal,
        CalculatorKind::FutureValue,
        CalculatorKind::CreditScoreImpact,
        CalculatorKind::AmortizationSchedule,
        CalculatorKind::AsphaltVolume,
        CalculatorKind::HydraulicForce,
        CalculatorKind::ZScore,
        CalculatorKind::RouteDistance,
        CalculatorKind::DueDate,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            CalculatorKind::LoanAffordability => "loan-affordability",
            CalculatorKind::SavingsGoal => "savings-goal",
            CalculatorKind::FutureValue => "future-value",
            CalculatorKind::CreditScoreImpact => "credit-score-impact",
            CalculatorKind::AmortizationSchedule => "amortization-schedule",
            CalculatorKind::AsphaltVolume => "asphalt-volume",
            CalculatorKind::HydraulicForce => "hydraulic-force",
            CalculatorKind::ZScore => "z-score",
            CalculatorKind::RouteDistance => "route-distance",
            CalculatorKind::DueDate => "due-date",
        }
    }

    pub fn calculator(&self) -> &'static dyn Calculator {
        match self {
            CalculatorKind::LoanAffordability => &LoanAffordability,
            CalculatorKind::SavingsGoal => &SavingsGoal,
            CalculatorKind::FutureValue => &FutureValue,
            CalculatorKind::CreditScoreImpact => &CreditScoreImpact,
            CalculatorKind::AmortizationSchedule => &AmortizationScheduleCalculator,
            CalculatorKind::AsphaltVolume => &AsphaltVolume,
            CalculatorKind::HydraulicForce => &HydraulicForce,
            CalculatorKind::ZScore => &ZScore,
            CalculatorKind::RouteDistance => &RouteDistance,
            CalculatorKind::DueDate => &DueDate,
        }
    }

    pub fn title(&self) -> &'static str {
        self.calculator().title()
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CalculatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        CalculatorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| format!("Unknown calculator: {}", s))
    }
}
