use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::error::ExpressionError;
use crate::value::{Variant, VariantType};

use super::VariantOperations;

/// Coercing strategy: scalars convert to each other through numeric
/// widening/narrowing, 0/1 booleans, text parsing and formatting.
///
/// Dates convert to and from milliseconds since the Unix epoch; spans to and
/// from milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeUnsafeOperations;

fn fail(value: &Variant, target: VariantType, message: impl Into<String>) -> ExpressionError {
    ExpressionError::conversion(value.kind(), target, message)
}

fn float_to_i64(value: f64) -> Option<i64> {
    (value.is_finite() && value >= i64::MIN as f64 && value <= i64::MAX as f64)
        .then(|| value.trunc() as i64)
}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Some(value.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|value| value.and_utc())
}

impl TypeUnsafeOperations {
    fn to_long(&self, value: &Variant, target: VariantType) -> Result<i64, ExpressionError> {
        match value {
            Variant::Integer(value) => Ok(i64::from(*value)),
            Variant::Long(value) => Ok(*value),
            Variant::Boolean(value) => Ok(i64::from(*value)),
            Variant::Float(number) => float_to_i64(f64::from(*number))
                .ok_or_else(|| fail(value, target, "value is out of range")),
            Variant::Double(number) => {
                float_to_i64(*number).ok_or_else(|| fail(value, target, "value is out of range"))
            }
            Variant::String(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| text.parse::<f64>().ok().and_then(float_to_i64))
                    .ok_or_else(|| fail(value, target, format!("'{text}' is not a number")))
            }
            Variant::DateTime(date) => Ok(date.timestamp_millis()),
            Variant::TimeSpan(span) => Ok(span.num_milliseconds()),
            _ => Err(fail(value, target, "no conversion exists")),
        }
    }

    fn to_double(&self, value: &Variant, target: VariantType) -> Result<f64, ExpressionError> {
        match value {
            Variant::Boolean(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
            Variant::String(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| fail(value, target, format!("'{text}' is not a number"))),
            Variant::DateTime(date) => Ok(date.timestamp_millis() as f64),
            Variant::TimeSpan(span) => Ok(span.num_milliseconds() as f64),
            other => other
                .to_f64()
                .ok_or_else(|| fail(value, target, "no conversion exists")),
        }
    }

    fn to_boolean(&self, value: &Variant) -> Result<bool, ExpressionError> {
        match value {
            Variant::Integer(number) => Ok(*number != 0),
            Variant::Long(number) => Ok(*number != 0),
            Variant::Float(number) => Ok(*number != 0.0),
            Variant::Double(number) => Ok(*number != 0.0),
            Variant::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(fail(
                    value,
                    VariantType::Boolean,
                    format!("'{text}' is not a boolean"),
                )),
            },
            _ => Err(fail(value, VariantType::Boolean, "no conversion exists")),
        }
    }
}

impl VariantOperations for TypeUnsafeOperations {
    fn convert(&self, value: &Variant, target: VariantType) -> Result<Variant, ExpressionError> {
        if value.kind() == target || value.is_null() {
            return Ok(value.clone());
        }

        match target {
            VariantType::Null => Ok(Variant::Null),
            VariantType::Integer => {
                let number = self.to_long(value, target)?;
                i32::try_from(number)
                    .map(Variant::Integer)
                    .map_err(|_| fail(value, target, "value is out of range"))
            }
            VariantType::Long => self.to_long(value, target).map(Variant::Long),
            VariantType::Float => self
                .to_double(value, target)
                .map(|number| Variant::Float(number as f32)),
            VariantType::Double => self.to_double(value, target).map(Variant::Double),
            VariantType::Boolean => self.to_boolean(value).map(Variant::Boolean),
            VariantType::String => match value {
                Variant::Array(_) => Err(fail(value, target, "arrays have no text form")),
                other => Ok(Variant::String(other.to_string())),
            },
            VariantType::DateTime => match value {
                Variant::String(text) => parse_datetime(text)
                    .map(Variant::DateTime)
                    .ok_or_else(|| fail(value, target, format!("'{text}' is not a date"))),
                Variant::Integer(_) | Variant::Long(_) | Variant::Float(_) | Variant::Double(_) => {
                    let millis = self.to_long(value, VariantType::Long)?;
                    DateTime::from_timestamp_millis(millis)
                        .map(Variant::DateTime)
                        .ok_or_else(|| fail(value, target, "value is out of range"))
                }
                _ => Err(fail(value, target, "no conversion exists")),
            },
            VariantType::TimeSpan => match value {
                Variant::Integer(_)
                | Variant::Long(_)
                | Variant::Float(_)
                | Variant::Double(_)
                | Variant::String(_) => {
                    let millis = self.to_long(value, VariantType::Long)?;
                    TimeDelta::try_milliseconds(millis)
                        .map(Variant::TimeSpan)
                        .ok_or_else(|| fail(value, target, "value is out of range"))
                }
                _ => Err(fail(value, target, "no conversion exists")),
            },
            VariantType::Object => match value {
                Variant::String(text) => serde_json::from_str(text)
                    .map(Variant::Object)
                    .map_err(|err| fail(value, target, err.to_string())),
                _ => Err(fail(value, target, "no conversion exists")),
            },
            VariantType::Array => Err(fail(value, target, "no conversion exists")),
        }
    }
}
