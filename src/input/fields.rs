//! Request-scoped form fields
//!
//! A calculator never sees anything but a `FormFields` value: the named inputs of
//! one invocation, exactly as submitted. A key that is absent means the field was
//! never bound (a silent no-op); a key that is present but blank or `null` is an
//! empty input.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::normalize::{normalize, Bounds};
use super::parse::{parse_iso_date, parse_number};
use crate::error::CalcError;

/// A field's wire key together with the label used in messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
}

impl Field {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// One submitted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl RawValue {
    /// Numeric interpretation, `None` when blank or not a finite number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) if n.is_finite() => Some(*n),
            RawValue::Number(_) | RawValue::Bool(_) => None,
            RawValue::Text(s) => parse_number(s),
        }
    }

    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawValue::Number(n) => Cow::Owned(n.to_string()),
            RawValue::Bool(b) => Cow::Owned(b.to_string()),
            RawValue::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// The named inputs of one calculator invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFields {
    values: BTreeMap<String, Option<RawValue>>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `key=value` style pairs; every value is kept as text
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Some(RawValue::Text(v.into()))))
            .collect();
        Self { values }
    }

    /// Builder-style insert, mostly for tests and programmatic callers
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<RawValue>) {
        self.values.insert(key.to_string(), Some(value.into()));
    }

    /// Merge another form over this one; the other side wins on conflicts
    pub fn merge(&mut self, other: FormFields) {
        self.values.extend(other.values);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value of a bound field; `Ok(None)` when it was submitted empty
    pub fn get(&self, key: &str) -> Result<Option<&RawValue>, CalcError> {
        match self.values.get(key) {
            Some(value) => Ok(value.as_ref().filter(|v| !v.is_blank())),
            None => Err(CalcError::MissingInput {
                field: key.to_string(),
            }),
        }
    }

    /// Raw value, treating an unbound field the same as a blank one
    fn get_optional(&self, key: &str) -> Option<&RawValue> {
        self.values
            .get(key)
            .and_then(|v| v.as_ref())
            .filter(|v| !v.is_blank())
    }

    /// Fail with `MissingInput` unless every key is bound
    pub fn require(&self, fields: &[Field]) -> Result<(), CalcError> {
        for field in fields {
            self.get(field.key)?;
        }
        Ok(())
    }

    /// Required numeric field with no default
    pub fn number(&self, field: Field, bounds: &Bounds) -> Result<f64, CalcError> {
        let raw = self.get(field.key)?;
        normalize(raw, None, bounds, field)
    }

    /// Optional numeric field; unbound, blank and unparseable input all fall back
    pub fn number_or(&self, field: Field, fallback: f64, bounds: &Bounds) -> Result<f64, CalcError> {
        normalize(self.get_optional(field.key), Some(fallback), bounds, field)
    }

    /// Parsed value of an optional field without any validation
    pub fn optional_number(&self, field: Field) -> Option<f64> {
        self.get_optional(field.key).and_then(RawValue::as_number)
    }

    /// Whether an optional field carries any input at all
    pub fn is_filled(&self, field: Field) -> bool {
        self.get_optional(field.key).is_some()
    }

    /// Enumerated select value. Unbound or blank input uses `default` when given.
    pub fn choice<T: FromStr>(&self, field: Field, default: Option<T>) -> Result<T, CalcError> {
        let raw = match (self.values.get(field.key), default) {
            (None, Some(default)) => return Ok(default),
            (None, None) => {
                return Err(CalcError::MissingInput {
                    field: field.key.to_string(),
                })
            }
            (Some(_), default) => match (self.get_optional(field.key), default) {
                (Some(raw), _) => raw,
                (None, Some(default)) => return Ok(default),
                (None, None) => {
                    return Err(CalcError::invalid(field.key, format!("Select a valid {}.", field.label)))
                }
            },
        };

        raw.as_text()
            .trim()
            .parse()
            .map_err(|_| CalcError::invalid(field.key, format!("Select a valid {}.", field.label)))
    }

    /// Required `YYYY-MM-DD` date
    pub fn date(&self, field: Field) -> Result<NaiveDate, CalcError> {
        let raw = self.get(field.key)?;
        raw.and_then(|v| parse_iso_date(&v.as_text()))
            .ok_or_else(|| {
                CalcError::invalid(
                    field.key,
                    format!("Enter a valid {} in YYYY-MM-DD format.", field.label),
                )
            })
    }

    /// Optional `YYYY-MM-DD` date; present but malformed input is still an error
    pub fn optional_date(&self, field: Field) -> Result<Option<NaiveDate>, CalcError> {
        match self.get_optional(field.key) {
            None => Ok(None),
            Some(raw) => parse_iso_date(&raw.as_text()).map(Some).ok_or_else(|| {
                CalcError::invalid(
                    field.key,
                    format!("Enter a valid {} in YYYY-MM-DD format.", field.label),
                )
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<RawValue>)> {
        self.values.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        let values = iter.into_iter().map(|(k, v)| (k.into(), Some(v))).collect();
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRINCIPAL: Field = Field::new("principal", "loan amount");
    const TIMING: Field = Field::new("timing", "contribution timing");

    #[derive(Debug, PartialEq)]
    enum Side {
        Left,
        Right,
    }

    impl FromStr for Side {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "left" => Ok(Side::Left),
                "right" => Ok(Side::Right),
                _ => Err(()),
            }
        }
    }

    #[test]
    fn test_deserialize_mixed_json() {
        let fields: FormFields =
            serde_json::from_str(r#"{"principal": "20,000", "rate": 6, "note": null}"#).unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.number(PRINCIPAL, &Bounds::positive()).unwrap(), 20000.0);
        assert_eq!(fields.get("note").unwrap(), None);
    }

    #[test]
    fn test_absent_key_is_missing_input() {
        let fields = FormFields::new();
        let err = fields.number(PRINCIPAL, &Bounds::positive()).unwrap_err();
        assert!(err.is_silent());
    }

    #[test]
    fn test_blank_key_is_invalid_input() {
        let fields = FormFields::new().with("principal", "  ");
        let err = fields.number(PRINCIPAL, &Bounds::positive()).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_number_or_falls_back_when_unbound_or_blank() {
        let fields = FormFields::new().with("principal", "");
        assert_eq!(fields.number_or(PRINCIPAL, 5.0, &Bounds::positive()).unwrap(), 5.0);
        assert_eq!(FormFields::new().number_or(PRINCIPAL, 7.0, &Bounds::positive()).unwrap(), 7.0);
    }

    #[test]
    fn test_choice_parsing() {
        let fields = FormFields::new().with("timing", "right");
        assert_eq!(fields.choice::<Side>(TIMING, None).unwrap(), Side::Right);

        let fields = FormFields::new().with("timing", "sideways");
        let err = fields.choice::<Side>(TIMING, None).unwrap_err();
        assert_eq!(err.to_string(), "Select a valid contribution timing.");

        assert_eq!(FormFields::new().choice(TIMING, Some(Side::Left)).unwrap(), Side::Left);
        assert!(FormFields::new().choice::<Side>(TIMING, None).unwrap_err().is_silent());
    }

    #[test]
    fn test_dates() {
        let field = Field::new("lmp_date", "LMP date");
        let fields = FormFields::from_pairs([("lmp_date", "2024-01-15")]);
        assert_eq!(fields.date(field).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        let fields = FormFields::from_pairs([("lmp_date", "15/01/2024")]);
        assert_eq!(
            fields.date(field).unwrap_err().to_string(),
            "Enter a valid LMP date in YYYY-MM-DD format."
        );

        assert_eq!(FormFields::new().optional_date(field).unwrap(), None);
    }
}
