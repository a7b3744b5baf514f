//! Form input parsing, normalization and validation

mod fields;
mod normalize;
mod parse;

pub use fields::{Field, FormFields, RawValue};
pub use normalize::{check_range, normalize, Bounds};
pub use parse::{parse_iso_date, parse_number};
