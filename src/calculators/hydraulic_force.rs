//! Push and pull force of a hydraulic cylinder

use std::f64::consts::PI;

use serde::Serialize;

use super::Calculator;
use crate::error::{ensure_finite, CalcError};
use crate::guardrails::Guardrails;
use crate::input::{Bounds, Field, FormFields};
use crate::outcome::{format_two_decimals, ResultBuilder, ResultLine};
use crate::units::{LengthUnit, PressureUnit, N_PER_TONNE_FORCE, PA_PER_BAR};

const PRESSURE: Field = Field::new("pressure", "system pressure");
const PRESSURE_UNIT: Field = Field::new("pressure_unit", "pressure unit");
const BORE: Field = Field::new("bore_diameter", "cylinder bore diameter");
const ROD: Field = Field::new("rod_diameter", "rod diameter");
const DIAMETER_UNIT: Field = Field::new("diameter_unit", "diameter unit");
const EFFICIENCY: Field = Field::new("efficiency_percent", "efficiency");

/// Forces and areas in SI units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CylinderForces {
    pub bore_area_m2: f64,
    pub extension_n: f64,
    /// Annulus area and pull force, present only when a rod is given
    pub annulus_area_m2: Option<f64>,
    pub retraction_n: Option<f64>,
    pub force_per_bar_n: f64,
}

impl CylinderForces {
    /// `efficiency` is a fraction in `(0, 1]`
    pub fn new(
        pressure_pa: f64,
        bore_m: f64,
        rod_m: Option<f64>,
        efficiency: f64,
    ) -> Result<Self, CalcError> {
        if let Some(rod) = rod_m {
            if rod >= bore_m {
                return Err(CalcError::inconsistent(
                    "Rod diameter must be smaller than the bore diameter.",
                ));
            }
        }

        let bore_area_m2 = circle_area(bore_m);
        let annulus_area_m2 = rod_m.map(|rod| (bore_area_m2 - circle_area(rod)).max(0.0));

        Ok(Self {
            bore_area_m2,
            extension_n: ensure_finite("extension force", pressure_pa * bore_area_m2 * efficiency)?,
            annulus_area_m2,
            retraction_n: annulus_area_m2.map(|area| pressure_pa * area * efficiency),
            force_per_bar_n: PA_PER_BAR * bore_area_m2 * efficiency,
        })
    }
}

fn circle_area(diameter: f64) -> f64 {
    PI * (diameter / 2.0).powi(2)
}

fn describe_force(newtons: f64) -> String {
    format!(
        "{} N ({} kN, {} tf)",
        format_two_decimals(newtons),
        format_two_decimals(newtons / 1000.0),
        format_two_decimals(newtons / N_PER_TONNE_FORCE)
    )
}

pub struct HydraulicForce;

impl Calculator for HydraulicForce {
    fn title(&self) -> &'static str {
        "Hydraulic Force Calculator"
    }

    fn calculate(
        &self,
        fields: &FormFields,
        guardrails: &Guardrails,
    ) -> Result<Vec<ResultLine>, CalcError> {
        fields.require(&[PRESSURE, PRESSURE_UNIT, BORE, DIAMETER_UNIT])?;

        let pressure = fields.number(PRESSURE, &Bounds::positive())?;
        let bore = fields.number(BORE, &Bounds::positive())?;

        // Blank, zero and negative rod or efficiency entries mean "not given"
        let rod = fields.optional_number(ROD).filter(|v| *v > 0.0);
        let guards = &guardrails.hydraulic;
        let efficiency_percent = fields
            .optional_number(EFFICIENCY)
            .filter(|v| *v > 0.0)
            .map(|v| guards.efficiency_clamp.clamp(v))
            .unwrap_or(guards.default_efficiency_percent);

        let pressure_unit: PressureUnit = fields.choice(PRESSURE_UNIT, Some(PressureUnit::Bar))?;
        let diameter_unit: LengthUnit = fields.choice(DIAMETER_UNIT, Some(LengthUnit::Millimeters))?;

        let forces = CylinderForces::new(
            pressure_unit.to_pascals(pressure),
            diameter_unit.to_meters(bore),
            rod.map(|r| diameter_unit.to_meters(r)),
            efficiency_percent / 100.0,
        )?;

        let mut builder = ResultBuilder::new()
            .text("Extension (push) force", describe_force(forces.extension_n))
            .amount("Piston area (bore)", forces.bore_area_m2 * 10_000.0, "cm²")?;

        builder = match (forces.retraction_n, forces.annulus_area_m2) {
            (Some(pull), Some(annulus)) => builder
                .text("Retraction (pull) force", describe_force(pull))
                .amount("Effective pull area (annulus)", annulus * 10_000.0, "cm²")?,
            _ => builder.text(
                "Retraction (pull) force",
                "Add rod diameter to calculate pull force.",
            ),
        };

        Ok(builder
            .amount("Force per 1 bar (extension)", forces.force_per_bar_n, "N per bar")?
            .percent("Efficiency used", efficiency_percent)?
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::CalculationOutcome;

    fn form() -> FormFields {
        FormFields::from_pairs([
            ("pressure", "200"),
            ("pressure_unit", "bar"),
            ("bore_diameter", "50"),
            ("diameter_unit", "mm"),
        ])
    }

    fn run(fields: &FormFields) -> CalculationOutcome {
        CalculationOutcome::from_result(HydraulicForce.calculate(fields, &Guardrails::default()))
    }

    #[test]
    fn test_extension_only() {
        let outcome = run(&form());
        assert_eq!(
            outcome.value("Extension (push) force"),
            Some("35,342.92 N (35.34 kN, 3.60 tf)")
        );
        assert_eq!(outcome.value("Piston area (bore)"), Some("19.63 cm²"));
        assert_eq!(
            outcome.value("Retraction (pull) force"),
            Some("Add rod diameter to calculate pull force.")
        );
        assert_eq!(outcome.value("Force per 1 bar (extension)"), Some("176.71 N per bar"));
        assert_eq!(outcome.value("Efficiency used"), Some("90.00%"));
    }

    #[test]
    fn test_with_rod() {
        let outcome = run(&form().with("rod_diameter", "30"));
        assert_eq!(
            outcome.value("Retraction (pull) force"),
            Some("22,619.47 N (22.62 kN, 2.31 tf)")
        );
        assert_eq!(outcome.value("Effective pull area (annulus)"), Some("12.57 cm²"));
    }

    #[test]
    fn test_rod_not_smaller_than_bore() {
        for rod in ["50", "60"] {
            let result = HydraulicForce.calculate(&form().with("rod_diameter", rod), &Guardrails::default());
            assert_eq!(
                result,
                Err(CalcError::inconsistent(
                    "Rod diameter must be smaller than the bore diameter."
                ))
            );
        }
    }

    #[test]
    fn test_efficiency_is_clamped() {
        let outcome = run(&form().with("efficiency_percent", "140"));
        assert_eq!(outcome.value("Efficiency used"), Some("100.00%"));
        let outcome = run(&form().with("efficiency_percent", "0.5"));
        assert_eq!(outcome.value("Efficiency used"), Some("1.00%"));
    }

    #[test]
    fn test_psi_and_inches() {
        let forces = CylinderForces::new(
            PressureUnit::Psi.to_pascals(1000.0),
            LengthUnit::Inches.to_meters(2.0),
            None,
            1.0,
        )
        .unwrap();
        // 1000 psi over a 2 in bore is about 3141.6 lbf, or roughly 13.97 kN
        assert!((forces.extension_n - 13_974.6).abs() < 1.0, "{}", forces.extension_n);
        assert_eq!(forces.retraction_n, None);
    }
}
