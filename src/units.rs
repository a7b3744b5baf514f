//! Unit conversion factors and select-value parsing for unit pickers

use std::fmt;
use std::str::FromStr;

/// Square feet per square meter
pub const SQ_FT_PER_SQ_M: f64 = 10.76391041671;
/// Square feet per square yard
pub const SQ_FT_PER_SQ_YD: f64 = 9.0;
/// Millimeters per foot
pub const MM_PER_FT: f64 = 304.8;
/// Cubic feet per cubic yard
pub const CU_FT_PER_CU_YD: f64 = 27.0;
/// Cubic feet per cubic meter
pub const CU_FT_PER_CU_M: f64 = 35.3146667215;
/// Pounds per US short ton
pub const LB_PER_SHORT_TON: f64 = 2000.0;
/// Pounds per metric tonne
pub const LB_PER_TONNE: f64 = 2204.62262185;
/// Pascals per bar
pub const PA_PER_BAR: f64 = 100_000.0;
/// Pascals per psi
pub const PA_PER_PSI: f64 = 6894.757293168;
/// Newtons per tonne-force
pub const N_PER_TONNE_FORCE: f64 = 9806.65;
/// Miles per kilometer
pub const MI_PER_KM: f64 = 0.621371;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaUnit {
    SquareFeet,
    SquareMeters,
    SquareYards,
}

impl AreaUnit {
    pub fn to_square_feet(&self, value: f64) -> f64 {
        match self {
            AreaUnit::SquareFeet => value,
            AreaUnit::SquareMeters => value * SQ_FT_PER_SQ_M,
            AreaUnit::SquareYards => value * SQ_FT_PER_SQ_YD,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AreaUnit::SquareFeet => "ft2",
            AreaUnit::SquareMeters => "m2",
            AreaUnit::SquareYards => "yd2",
        }
    }
}

impl FromStr for AreaUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ft2" | "sqft" => Ok(AreaUnit::SquareFeet),
            "m2" | "sqm" => Ok(AreaUnit::SquareMeters),
            "yd2" | "sqyd" => Ok(AreaUnit::SquareYards),
            other => Err(format!("Unknown area unit: {}", other)),
        }
    }
}

impl fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Millimeters,
    Centimeters,
    Meters,
    Inches,
    Feet,
}

impl LengthUnit {
    pub fn to_feet(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Millimeters => value / MM_PER_FT,
            LengthUnit::Centimeters => value / (MM_PER_FT / 10.0),
            LengthUnit::Meters => value / (MM_PER_FT / 1000.0),
            LengthUnit::Inches => value / 12.0,
            LengthUnit::Feet => value,
        }
    }

    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            LengthUnit::Millimeters => value / 1000.0,
            LengthUnit::Centimeters => value / 100.0,
            LengthUnit::Meters => value,
            LengthUnit::Inches => value * 0.0254,
            LengthUnit::Feet => value * 0.3048,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Meters => "m",
            LengthUnit::Inches => "in",
            LengthUnit::Feet => "ft",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" => Ok(LengthUnit::Millimeters),
            "cm" => Ok(LengthUnit::Centimeters),
            "m" => Ok(LengthUnit::Meters),
            "in" => Ok(LengthUnit::Inches),
            "ft" => Ok(LengthUnit::Feet),
            other => Err(format!("Unknown length unit: {}", other)),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureUnit {
    Bar,
    Psi,
    MegaPascal,
    Pascal,
}

impl PressureUnit {
    pub fn to_pascals(&self, value: f64) -> f64 {
        match self {
            PressureUnit::Bar => value * PA_PER_BAR,
            PressureUnit::Psi => value * PA_PER_PSI,
            PressureUnit::MegaPascal => value * 1_000_000.0,
            PressureUnit::Pascal => value,
        }
    }
}

impl FromStr for PressureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(PressureUnit::Bar),
            "psi" => Ok(PressureUnit::Psi),
            "mpa" => Ok(PressureUnit::MegaPascal),
            "pa" => Ok(PressureUnit::Pascal),
            other => Err(format!("Unknown pressure unit: {}", other)),
        }
    }
}

/// Distance units for travel calculators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Kilometers,
    Miles,
}

impl DistanceUnit {
    pub fn from_km(&self, km: f64) -> f64 {
        match self {
            DistanceUnit::Kilometers => km,
            DistanceUnit::Miles => km * MI_PER_KM,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km/h",
            DistanceUnit::Miles => "mph",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "km" => Ok(DistanceUnit::Kilometers),
            "mi" => Ok(DistanceUnit::Miles),
            other => Err(format!("Unknown distance unit: {}", other)),
        }
    }
}
