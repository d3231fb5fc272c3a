//! JSON <-> Variant conversion utilities

use serde_json::{Number, Value};

use crate::Variant;

/// Convert a JSON value to a Variant.
///
/// Integral numbers become Integer when they fit 32 bits and Long otherwise;
/// JSON objects are kept whole as an Object payload.
pub fn json_to_variant(value: Value) -> Variant {
    match value {
        Value::Null => Variant::Null,
        Value::Bool(b) => Variant::Boolean(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => match i32::try_from(i) {
                Ok(small) => Variant::Integer(small),
                Err(_) => Variant::Long(i),
            },
            None => n.as_f64().map_or(Variant::Null, Variant::Double),
        },
        Value::String(s) => Variant::String(s),
        Value::Array(arr) => Variant::Array(arr.into_iter().map(json_to_variant).collect()),
        object @ Value::Object(_) => Variant::Object(object),
    }
}

/// Convert a Variant to JSON.
///
/// DateTime renders as RFC 3339 text and TimeSpan as milliseconds. Non-finite
/// floats have no JSON form and become null.
pub fn variant_to_json(value: &Variant) -> Value {
    match value {
        Variant::Null => Value::Null,
        Variant::Boolean(b) => Value::Bool(*b),
        Variant::Integer(i) => Value::Number((*i).into()),
        Variant::Long(i) => Value::Number((*i).into()),
        // through the shortest decimal form so 0.1f32 stays 0.1
        Variant::Float(f) => float_to_json(f.to_string().parse().unwrap_or(f64::NAN)),
        Variant::Double(f) => float_to_json(*f),
        Variant::String(s) => Value::String(s.clone()),
        Variant::DateTime(_) => Value::String(value.to_string()),
        Variant::TimeSpan(span) => Value::Number(span.num_milliseconds().into()),
        Variant::Object(object) => object.clone(),
        Variant::Array(values) => Value::Array(values.iter().map(variant_to_json).collect()),
    }
}

fn float_to_json(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[test]
fn test_json_numbers_pick_narrowest_integer() {
    assert_eq!(json_to_variant(serde_json::json!(7)), Variant::Integer(7));
    assert_eq!(
        json_to_variant(serde_json::json!(5_000_000_000i64)),
        Variant::Long(5_000_000_000)
    );
    assert_eq!(json_to_variant(serde_json::json!(1.5)), Variant::Double(1.5));
}

#[test]
fn test_float_keeps_short_form() {
    assert_eq!(variant_to_json(&Variant::Float(0.1)), serde_json::json!(0.1));
    assert_eq!(variant_to_json(&Variant::Double(f64::NAN)), Value::Null);
}
