//! Great-circle distance between two coordinates with a road detour estimate

use super::Calculator;
use crate::error::{ensure_finite, CalcError};
use crate::guardrails::{Guardrails, RangeGuard};
use crate::input::{Bounds, Field, FormFields};
use crate::outcome::{format_two_decimals, ResultBuilder, ResultLine};
use crate::units::DistanceUnit;

/// Mean Earth radius
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const START_LAT: Field = Field::new("start_lat", "start latitude");
const START_LON: Field = Field::new("start_lon", "start longitude");
const END_LAT: Field = Field::new("end_lat", "end latitude");
const END_LON: Field = Field::new("end_lon", "end longitude");
const UNIT: Field = Field::new("unit", "distance unit");
const DETOUR: Field = Field::new("detour_percent", "detour factor");
const SPEED: Field = Field::new("avg_speed", "average speed");

const LATITUDE: Bounds = Bounds::between(-90.0, 90.0);
const LONGITUDE: Bounds = Bounds::between(-180.0, 180.0);
const PERCENT: RangeGuard = RangeGuard::new(0.0, 100.0);

/// Haversine distance in kilometers between two points given in degrees
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Longest travel time rendered, in minutes (about 19 million years)
const MAX_DURATION_MINUTES: f64 = 1e13;

/// "2 h 5 min", or just "45 min" under an hour
fn format_duration(total_minutes: f64) -> Result<String, CalcError> {
    let total_minutes = ensure_finite("travel time", total_minutes)?;
    if !(0.0..=MAX_DURATION_MINUTES).contains(&total_minutes) {
        return Err(CalcError::overflow("travel time"));
    }

    let minutes = total_minutes.round() as u64;
    let (hours, rest) = (minutes / 60, minutes % 60);
    Ok(if hours == 0 {
        format!("{} min", rest)
    } else {
        format!("{} h {} min", hours, rest)
    })
}

pub struct RouteDistance;

impl Calculator for RouteDistance {
    fn title(&self) -> &'static str {
        "Route Distance Calculator"
    }

    fn calculate(
        &self,
        fields: &FormFields,
        guardrails: &Guardrails,
    ) -> Result<Vec<ResultLine>, CalcError> {
        fields.require(&[START_LAT, START_LON, END_LAT, END_LON])?;

        let start_lat = fields.number(START_LAT, &LATITUDE)?;
        let start_lon = fields.number(START_LON, &LONGITUDE)?;
        let end_lat = fields.number(END_LAT, &LATITUDE)?;
        let end_lon = fields.number(END_LON, &LONGITUDE)?;

        let unit: DistanceUnit = fields.choice(UNIT, Some(DistanceUnit::Kilometers))?;
        let guards = &guardrails.route;

        let detour = PERCENT.clamp(
            fields
                .optional_number(DETOUR)
                .unwrap_or(guards.default_detour_percent),
        );
        let speed = fields
            .optional_number(SPEED)
            .filter(|v| *v > 0.0)
            .unwrap_or(match unit {
                DistanceUnit::Kilometers => guards.default_speed_kmh,
                DistanceUnit::Miles => guards.default_speed_mph,
            });

        let straight_km = haversine_km(start_lat, start_lon, end_lat, end_lon);
        let road_km = straight_km * (1.0 + detour / 100.0);
        let detour_low = PERCENT.clamp(detour - guards.detour_spread_percent);
        let detour_high = PERCENT.clamp(detour + guards.detour_spread_percent);

        let straight = unit.from_km(straight_km);
        let road = unit.from_km(road_km);
        let road_low = unit.from_km(straight_km * (1.0 + detour_low / 100.0));
        let road_high = unit.from_km(straight_km * (1.0 + detour_high / 100.0));

        Ok(ResultBuilder::new()
            .amount("Straight-line distance", straight, unit.symbol())?
            .amount("Estimated road distance", road, unit.symbol())?
            .text(
                "Estimated travel time",
                format!(
                    "{} (at {} {})",
                    format_duration(road / speed * 60.0)?,
                    format_two_decimals(speed),
                    unit.speed_symbol()
                ),
            )
            .text(
                "Quick range",
                format!(
                    "{} to {} {} (using detour {}% to {}%)",
                    format_two_decimals(road_low),
                    format_two_decimals(road_high),
                    unit.symbol(),
                    format_two_decimals(detour_low),
                    format_two_decimals(detour_high)
                ),
            )
            .text(
                "Assumptions used",
                format!(
                    "Detour factor {}% and average speed {} {}.",
                    format_two_decimals(detour),
                    format_two_decimals(speed),
                    unit.speed_symbol()
                ),
            )
            .build())
    }
}
