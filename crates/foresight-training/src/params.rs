use crate::error::{Result, TrainingError};
use crate::family::ModelFamily;
use crate::schema::{schema_for, FieldKind, FieldSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// A coerced parameter value as it appears in a training request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Editable hyperparameters for the active model family.
///
/// Values are kept verbatim, as typed, and only coerced when a request is
/// built. The set always holds exactly the fields of the family's schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    family: ModelFamily,
    values: BTreeMap<&'static str, String>,
}

impl ParameterSet {
    /// Schema defaults for `family`.
    #[must_use]
    pub fn defaults_for(family: ModelFamily) -> Self {
        let values = schema_for(family).into_iter().map(|field| (field.name, field.default.to_string())).collect();
        Self { family, values }
    }

    #[must_use]
    pub fn family(&self) -> ModelFamily {
        self.family
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Stores `raw` for an active field. Returns `false`, leaving the set
    /// untouched, when `name` is not part of the current schema.
    pub fn set(&mut self, name: &str, raw: impl Into<String>) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = raw.into();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fields with their current raw values, in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &str)> + '_ {
        schema_for(self.family)
            .into_iter()
            .filter_map(|field| self.values.get(field.name).map(|raw| (field, raw.as_str())))
    }

    /// Converts every field to its declared kind.
    pub fn coerce(&self) -> Result<BTreeMap<String, ParamValue>> {
        self.iter().map(|(field, raw)| Ok((field.name.to_string(), field.coerce(raw)?))).collect()
    }
}

impl FieldSpec {
    /// Converts a raw input to this field's kind: integers by truncating
    /// parse, floats by decimal parse, enum values passed through.
    ///
    /// Out-of-range values are reported with a warning but kept.
    pub fn coerce(&self, raw: &str) -> Result<ParamValue> {
        let invalid = || TrainingError::InvalidParameter { name: self.name.to_string(), value: raw.to_string() };

        let value = match self.kind {
            FieldKind::Integer => ParamValue::Integer(parse_int_prefix(raw).ok_or_else(invalid)?),
            FieldKind::Float => ParamValue::Float(parse_float_prefix(raw).ok_or_else(invalid)?),
            FieldKind::Choice(values) => {
                if !values.contains(&raw) {
                    warn!(field = self.name, value = raw, allowed = ?values, "value is not one of the declared choices");
                }
                return Ok(ParamValue::Text(raw.to_string()));
            }
        };

        let numeric = match value {
            ParamValue::Integer(n) => n as f64,
            ParamValue::Float(x) => x,
            ParamValue::Text(_) => return Ok(value),
        };
        let below = self.min.is_some_and(|min| numeric < min);
        let above = self.max.is_some_and(|max| numeric > max);
        if below || above {
            warn!(field = self.name, value = numeric, min = ?self.min, max = ?self.max, "parameter outside declared bounds");
        }

        Ok(value)
    }
}

/// Leading integer of `raw`, ignoring surrounding whitespace and anything after
/// the digits ("3.7" -> 3, "12abc" -> 12).
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

/// Longest decimal prefix of `raw` ("0.05" -> 0.05, "1.5e2x" -> 150).
/// `None` when there is no digit before the exponent or the value overflows.
fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let end = decimal_prefix_len(s.as_bytes())?;
    s[..end].parse::<f64>().ok().filter(|x| x.is_finite())
}

/// Length of the leading `[+-]digits[.digits][(e|E)[+-]digits]` run. An
/// exponent marker without digits after it is left out of the run.
fn decimal_prefix_len(bytes: &[u8]) -> Option<usize> {
    let digits_from = |start: usize| bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let whole = digits_from(end);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        end += 1 + fraction;
    }
    if whole + fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }
    Some(end)
}
