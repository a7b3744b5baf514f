//! Asphalt volume and tonnage for a paved area

use serde::Serialize;

use super::Calculator;
use crate::error::{ensure_finite, CalcError};
use crate::guardrails::Guardrails;
use crate::input::{Bounds, Field, FormFields};
use crate::outcome::{format_two_decimals, ResultBuilder, ResultLine};
use crate::units::{
    AreaUnit, LengthUnit, CU_FT_PER_CU_M, CU_FT_PER_CU_YD, LB_PER_SHORT_TON, LB_PER_TONNE,
};

const AREA: Field = Field::new("area", "area");
const AREA_UNIT: Field = Field::new("area_unit", "area unit");
const THICKNESS: Field = Field::new("thickness", "thickness");
const THICKNESS_UNIT: Field = Field::new("thickness_unit", "thickness unit");
const WASTE: Field = Field::new("waste_percent", "waste factor");
const DENSITY: Field = Field::new("density_lb_ft3", "asphalt density");

/// Volume and weight of one pour, waste included
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AsphaltEstimate {
    pub volume_ft3: f64,
    pub volume_yd3: f64,
    pub volume_m3: f64,
    pub weight_lb: f64,
    pub weight_short_tons: f64,
    pub weight_tonnes: f64,
}

impl AsphaltEstimate {
    pub fn new(
        area_ft2: f64,
        thickness_ft: f64,
        waste_percent: f64,
        density_lb_ft3: f64,
    ) -> Result<Self, CalcError> {
        let volume_ft3 = ensure_finite("volume", area_ft2 * thickness_ft * (1.0 + waste_percent / 100.0))?;
        let weight_lb = ensure_finite("weight", volume_ft3 * density_lb_ft3)?;

        Ok(Self {
            volume_ft3,
            volume_yd3: volume_ft3 / CU_FT_PER_CU_YD,
            volume_m3: volume_ft3 / CU_FT_PER_CU_M,
            weight_lb,
            weight_short_tons: weight_lb / LB_PER_SHORT_TON,
            weight_tonnes: weight_lb / LB_PER_TONNE,
        })
    }
}

pub struct AsphaltVolume;

impl Calculator for AsphaltVolume {
    fn title(&self) -> &'static str {
        "Asphalt Volume Calculator"
    }

    fn calculate(
        &self,
        fields: &FormFields,
        guardrails: &Guardrails,
    ) -> Result<Vec<ResultLine>, CalcError> {
        fields.require(&[AREA, AREA_UNIT, THICKNESS, THICKNESS_UNIT])?;

        let area = fields.number(AREA, &Bounds::positive())?;
        let thickness = fields.number(THICKNESS, &Bounds::positive())?;

        let guards = &guardrails.asphalt;
        let waste = fields.number_or(WASTE, 0.0, &Bounds::non_negative())?;
        if let Some(max_waste) = guards.max_waste_percent {
            if waste > max_waste {
                return Err(CalcError::out_of_range(
                    WASTE.key,
                    format!("Waste factor looks too high. Enter 0% to {}%.", max_waste),
                ));
            }
        }

        let density = fields.number_or(DENSITY, guards.default_density, &Bounds::positive())?;
        if let Some(window) = guards.density_range {
            if !window.contains(density) {
                return Err(CalcError::out_of_range(
                    DENSITY.key,
                    format!(
                        "Asphalt density looks unusual. Use a value roughly between {} and {} lb/ft³, or leave it blank to use {}.",
                        window.min, window.max, guards.default_density
                    ),
                ));
            }
        }

        let area_unit: AreaUnit = fields.choice(AREA_UNIT, Some(AreaUnit::SquareFeet))?;
        let thickness_unit: LengthUnit = fields.choice(THICKNESS_UNIT, Some(LengthUnit::Inches))?;

        let estimate = AsphaltEstimate::new(
            area_unit.to_square_feet(area),
            thickness_unit.to_feet(thickness),
            waste,
            density,
        )?;

        Ok(ResultBuilder::new()
            .text(
                "Volume",
                format!(
                    "{} yd³ ({} m³)",
                    format_two_decimals(estimate.volume_yd3),
                    format_two_decimals(estimate.volume_m3)
                ),
            )
            .amount("Volume (cubic feet)", estimate.volume_ft3, "ft³")?
            .text(
                "Weight",
                format!(
                    "{} tons (US) ({} tonnes)",
                    format_two_decimals(estimate.weight_short_tons),
                    format_two_decimals(estimate.weight_tonnes)
                ),
            )
            .amount("Area", area, area_unit.symbol())?
            .amount("Thickness", thickness, thickness_unit.symbol())?
            .percent("Waste factor", waste)?
            .amount("Density", density, "lb/ft³")?
            .text(
                "Quick ordering check",
                format!(
                    "About {} US tons (or {} tonnes) total.",
                    format_two_decimals(estimate.weight_short_tons),
                    format_two_decimals(estimate.weight_tonnes)
                ),
            )
            .build())
    }
}
