//! The default function library.

use chrono::{Datelike, TimeDelta, TimeZone, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ExpressionError;
use crate::operations::VariantOperations;
use crate::value::{Variant, VariantType};

use super::{DelegatedFunction, FunctionCollection};

type Calculator = fn(&[Variant], &dyn VariantOperations) -> Result<Variant, ExpressionError>;

pub(crate) fn register(collection: &mut FunctionCollection) {
    let library: [(&str, Calculator); 38] = [
        ("Now", now),
        ("Time", now),
        ("Ticks", ticks),
        ("Date", date),
        ("TimeSpan", time_span),
        ("DayOfWeek", day_of_week),
        ("Min", min),
        ("Max", max),
        ("Sum", sum),
        ("If", if_function),
        ("Choose", choose),
        ("E", |args, _| constant(args, std::f64::consts::E)),
        ("Pi", |args, _| constant(args, std::f64::consts::PI)),
        ("Rnd", random),
        ("Random", random),
        ("Abs", abs),
        ("Acos", |args, ops| math(args, ops, f64::acos)),
        ("Asin", |args, ops| math(args, ops, f64::asin)),
        ("Atan", |args, ops| math(args, ops, f64::atan)),
        ("Exp", |args, ops| math(args, ops, f64::exp)),
        ("Log", |args, ops| math(args, ops, f64::ln)),
        ("Ln", |args, ops| math(args, ops, f64::ln)),
        ("Log10", |args, ops| math(args, ops, f64::log10)),
        ("Ceil", |args, ops| math(args, ops, f64::ceil)),
        ("Ceiling", |args, ops| math(args, ops, f64::ceil)),
        ("Floor", |args, ops| math(args, ops, f64::floor)),
        ("Round", round),
        ("Trunc", trunc),
        ("Truncate", trunc),
        ("Cos", |args, ops| math(args, ops, f64::cos)),
        ("Sin", |args, ops| math(args, ops, f64::sin)),
        ("Tan", |args, ops| math(args, ops, f64::tan)),
        ("Sqr", |args, ops| math(args, ops, f64::sqrt)),
        ("Sqrt", |args, ops| math(args, ops, f64::sqrt)),
        ("Empty", empty),
        ("Null", null),
        ("Contains", contains),
        ("Array", |args, _| Ok(Variant::Array(args.to_vec()))),
    ];

    for (name, calculator) in library {
        collection.add(DelegatedFunction::new(name, calculator));
    }
}

fn expect_count(args: &[Variant], expected: usize) -> Result<(), ExpressionError> {
    if args.len() != expected {
        return Err(ExpressionError::wrong_param_count(
            expected.to_string(),
            args.len(),
        ));
    }
    Ok(())
}

fn expect_at_least(args: &[Variant], minimum: usize) -> Result<(), ExpressionError> {
    if args.len() < minimum {
        return Err(ExpressionError::wrong_param_count(
            format!("at least {minimum}"),
            args.len(),
        ));
    }
    Ok(())
}

/// Numbers are read as they are; only other kinds go through `ops`.
fn to_double(ops: &dyn VariantOperations, value: &Variant) -> Result<Option<f64>, ExpressionError> {
    if let Some(number) = value.to_f64() {
        return Ok(Some(number));
    }
    Ok(ops.convert(value, VariantType::Double)?.as_double())
}

fn to_long(ops: &dyn VariantOperations, value: &Variant) -> Result<i64, ExpressionError> {
    match value {
        Variant::Integer(number) => Ok(i64::from(*number)),
        Variant::Long(number) => Ok(*number),
        other => ops
            .convert(other, VariantType::Long)?
            .as_long()
            .ok_or_else(|| ExpressionError::InvalidArgument(format!("expected a number, found {other}"))),
    }
}

/// Whole numbers are milliseconds since the Unix epoch.
fn to_datetime(ops: &dyn VariantOperations, value: &Variant) -> Result<Option<chrono::DateTime<Utc>>, ExpressionError> {
    match value {
        Variant::Integer(_) | Variant::Long(_) => {
            let millis = to_long(ops, value)?;
            chrono::DateTime::from_timestamp_millis(millis)
                .map(Some)
                .ok_or_else(|| ExpressionError::InvalidArgument(format!("{millis} is out of the date range")))
        }
        other => Ok(ops.convert(other, VariantType::DateTime)?.as_datetime()),
    }
}

fn now(args: &[Variant], _ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_count(args, 0)?;
    Ok(Variant::DateTime(Utc::now()))
}

/// Milliseconds since the Unix epoch, of now or of the given date.
fn ticks(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    match args {
        [] => Ok(Variant::Long(Utc::now().timestamp_millis())),
        [value] => Ok(to_datetime(ops, value)?
            .map_or(Variant::Null, |date| Variant::Long(date.timestamp_millis()))),
        _ => Err(ExpressionError::wrong_param_count("0 or 1", args.len())),
    }
}

/// `Date(text | millis)` or `Date(year, month, day[, hour, minute, second, millis])`.
fn date(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    if let [value] = args {
        return Ok(to_datetime(ops, value)?.map_or(Variant::Null, Variant::DateTime));
    }
    if !(3..=7).contains(&args.len()) {
        return Err(ExpressionError::wrong_param_count("1 or 3 to 7", args.len()));
    }

    let mut parts = [0i64; 7];
    for (slot, value) in parts.iter_mut().zip(args) {
        *slot = to_long(ops, value)?;
    }
    let [year, month, day, hour, minute, second, millis] = parts;

    let invalid = || ExpressionError::InvalidArgument(format!("invalid date {year}-{month}-{day}"));
    let component = |value: i64| u32::try_from(value).map_err(|_| invalid());
    let year = i32::try_from(year).map_err(|_| invalid())?;

    let base = Utc
        .with_ymd_and_hms(
            year,
            component(month)?,
            component(day)?,
            component(hour)?,
            component(minute)?,
            component(second)?,
        )
        .single()
        .ok_or_else(invalid)?;
    let offset = TimeDelta::try_milliseconds(millis).ok_or_else(invalid)?;
    base.checked_add_signed(offset)
        .map(Variant::DateTime)
        .ok_or_else(invalid)
}

/// `TimeSpan(millis)`, `TimeSpan(h, m, s)` or `TimeSpan(d, h, m, s[, millis])`.
fn time_span(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    let values = args
        .iter()
        .map(|value| to_long(ops, value))
        .collect::<Result<Vec<_>, _>>()?;

    let (days, hours, minutes, seconds, millis) = match values.as_slice() {
        [millis] => (0, 0, 0, 0, *millis),
        [h, m, s] => (0, *h, *m, *s, 0),
        [d, h, m, s] => (*d, *h, *m, *s, 0),
        [d, h, m, s, ms] => (*d, *h, *m, *s, *ms),
        _ => return Err(ExpressionError::wrong_param_count("1, 3, 4 or 5", args.len())),
    };

    let total = days
        .checked_mul(24)
        .and_then(|value| value.checked_add(hours))
        .and_then(|value| value.checked_mul(60))
        .and_then(|value| value.checked_add(minutes))
        .and_then(|value| value.checked_mul(60))
        .and_then(|value| value.checked_add(seconds))
        .and_then(|value| value.checked_mul(1000))
        .and_then(|value| value.checked_add(millis))
        .and_then(TimeDelta::try_milliseconds)
        .ok_or(ExpressionError::Overflow { operation: "TimeSpan" })?;
    Ok(Variant::TimeSpan(total))
}

/// 0 = Sunday.
fn day_of_week(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_count(args, 1)?;
    Ok(to_datetime(ops, &args[0])?.map_or(Variant::Null, |date| {
        Variant::Integer(date.weekday().num_days_from_sunday() as i32)
    }))
}

fn min(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_at_least(args, 2)?;
    let mut result = &args[0];
    for value in &args[1..] {
        if ops.more(result, value)?.as_boolean() == Some(true) {
            result = value;
        }
    }
    Ok(result.clone())
}

fn max(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_at_least(args, 2)?;
    let mut result = &args[0];
    for value in &args[1..] {
        if ops.less(result, value)?.as_boolean() == Some(true) {
            result = value;
        }
    }
    Ok(result.clone())
}

fn sum(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_at_least(args, 2)?;
    args[1..]
        .iter()
        .try_fold(args[0].clone(), |total, value| ops.add(&total, value))
}

/// A Null condition counts as false.
fn if_function(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_count(args, 3)?;
    let condition = ops.convert(&args[0], VariantType::Boolean)?;
    Ok(if condition.as_boolean() == Some(true) {
        args[1].clone()
    } else {
        args[2].clone()
    })
}

/// `Choose(index, first, second, ...)` with a 1-based index.
fn choose(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_at_least(args, 3)?;
    let index = to_long(ops, &args[0])?;
    if index < 1 {
        return Err(ExpressionError::InvalidArgument(format!(
            "Choose index must be 1 or greater, found {index}"
        )));
    }
    let slot = usize::try_from(index).unwrap_or(usize::MAX);
    args.get(slot).cloned().ok_or_else(|| {
        ExpressionError::wrong_param_count(format!("at least {}", index.saturating_add(1)), args.len())
    })
}

fn constant(args: &[Variant], value: f64) -> Result<Variant, ExpressionError> {
    expect_count(args, 0)?;
    Ok(Variant::Double(value))
}

fn random(args: &[Variant], _ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_count(args, 0)?;
    Ok(Variant::Double(rand::random::<f64>()))
}

/// Keeps the numeric kind of its argument.
fn abs(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_count(args, 1)?;
    match &args[0] {
        Variant::Null => Ok(Variant::Null),
        Variant::Integer(value) => value
            .checked_abs()
            .map(Variant::Integer)
            .ok_or(ExpressionError::Overflow { operation: "Abs" }),
        Variant::Long(value) => value
            .checked_abs()
            .map(Variant::Long)
            .ok_or(ExpressionError::Overflow { operation: "Abs" }),
        Variant::Float(value) => Ok(Variant::Float(value.abs())),
        Variant::Double(value) => Ok(Variant::Double(value.abs())),
        other => Ok(to_double(ops, other)?.map_or(Variant::Null, |value| Variant::Double(value.abs()))),
    }
}

fn math(
    args: &[Variant],
    ops: &dyn VariantOperations,
    function: fn(f64) -> f64,
) -> Result<Variant, ExpressionError> {
    expect_count(args, 1)?;
    Ok(to_double(ops, &args[0])?.map_or(Variant::Null, |value| Variant::Double(function(value))))
}

/// `Round(x)` to a whole number, `Round(x, digits)` with decimal rounding,
/// midpoints away from zero.
fn round(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    let (value, digits) = match args {
        [value] => (value, None),
        [value, digits] => (value, Some(to_long(ops, digits)?)),
        _ => return Err(ExpressionError::wrong_param_count("1 or 2", args.len())),
    };
    let Some(number) = to_double(ops, value)? else {
        return Ok(Variant::Null);
    };

    let Some(digits) = digits else {
        return Ok(Variant::Double(number.round()));
    };
    let digits = u32::try_from(digits).map_err(|_| {
        ExpressionError::InvalidArgument(format!("Round digits must not be negative, found {digits}"))
    })?;

    let rounded = Decimal::from_f64(number)
        .map(|decimal| decimal.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|decimal| decimal.to_f64())
        .ok_or_else(|| ExpressionError::InvalidArgument(format!("{number} cannot be rounded")))?;
    Ok(Variant::Double(rounded))
}

/// Integer part as Integer, or Long when it does not fit.
fn trunc(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_count(args, 1)?;
    let Some(number) = to_double(ops, &args[0])? else {
        return Ok(Variant::Null);
    };
    let whole = number.trunc();
    if !whole.is_finite() || whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return Err(ExpressionError::Overflow { operation: "Trunc" });
    }
    let whole = whole as i64;
    Ok(i32::try_from(whole).map_or(Variant::Long(whole), Variant::Integer))
}

fn empty(args: &[Variant], _ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_count(args, 1)?;
    Ok(Variant::Boolean(args[0].is_empty()))
}

fn null(args: &[Variant], _ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_count(args, 0)?;
    Ok(Variant::Null)
}

/// String containment; a Null or empty haystack contains nothing.
fn contains(args: &[Variant], ops: &dyn VariantOperations) -> Result<Variant, ExpressionError> {
    expect_count(args, 2)?;
    let haystack = ops.convert(&args[0], VariantType::String)?;
    let needle = ops.convert(&args[1], VariantType::String)?;
    let found = match (haystack.as_string(), needle.as_string()) {
        (Some(haystack), Some(needle)) if !haystack.is_empty() => haystack.contains(needle),
        _ => false,
    };
    Ok(Variant::Boolean(found))
}
