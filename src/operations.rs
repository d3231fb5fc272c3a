//! # Variant operations
//!
//! Every operator the evaluator applies goes through a [`VariantOperations`]
//! strategy. The trait has one required method, [`convert`], and builds all
//! operators on top of it:
//!
//! 1. Null operands short-circuit (arithmetic, ordering, logic and LIKE
//!    yield Null; equality treats two Nulls as equal).
//! 2. A common operand kind is chosen from the two input kinds.
//! 3. Both operands are converted to that kind with `convert`.
//! 4. The operator runs on the matching payloads.
//!
//! Two strategies ship with the crate:
//!
//! - **[`TypeUnsafeOperations`]** converts freely between scalars
//!   (`'5' * 2` is `10`, `'a' + 1` is `'a1'`)
//! - **[`TypeSafeOperations`]** only accepts operands that already have the
//!   chosen kind, so `1 + 2` works but `1 + 2.5` fails
//!
//! ## Kind selection
//!
//! | Operands                      | Chosen kind                         |
//! |-------------------------------|-------------------------------------|
//! | same kind                     | that kind (two Strings in `- * / % ^` become Double) |
//! | Boolean/Integer/Long/Float/Double | the higher rung of that ladder  |
//! | `+` with any String           | String (concatenation)              |
//! | String and another scalar     | the other scalar's kind             |
//! | anything else                 | the left operand's kind             |
//!
//! [`convert`]: VariantOperations::convert
pub mod type_safe;
pub mod type_unsafe;

pub use type_safe::TypeSafeOperations;
pub use type_unsafe::TypeUnsafeOperations;

use std::cmp::Ordering;

use chrono::TimeDelta;
use regex::RegexBuilder;

use crate::error::ExpressionError;
use crate::value::{Variant, VariantType};

/// How operands are paired up before an operator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OperandMode {
    /// `+`: Strings absorb everything.
    Additive,
    /// `- * / % ^ << >>`: two Strings are read as numbers.
    Arithmetic,
    /// Comparisons, equality and logic.
    Comparison,
}

fn rank(kind: VariantType) -> Option<u8> {
    match kind {
        VariantType::Boolean => Some(0),
        VariantType::Integer => Some(1),
        VariantType::Long => Some(2),
        VariantType::Float => Some(3),
        VariantType::Double => Some(4),
        _ => None,
    }
}

/// Picks the kind both operands are converted to.
pub(crate) fn select_type(mode: OperandMode, left: VariantType, right: VariantType) -> VariantType {
    if left == right {
        return if left == VariantType::String && mode == OperandMode::Arithmetic {
            VariantType::Double
        } else {
            left
        };
    }

    if let (Some(left_rank), Some(right_rank)) = (rank(left), rank(right)) {
        return if left_rank >= right_rank { left } else { right };
    }

    if left == VariantType::String || right == VariantType::String {
        if mode == OperandMode::Additive {
            return VariantType::String;
        }
        let other = if left == VariantType::String { right } else { left };
        if !matches!(other, VariantType::Object | VariantType::Array) {
            return other;
        }
    }

    left
}

fn coerce_pair<O: VariantOperations + ?Sized>(
    ops: &O,
    mode: OperandMode,
    left: &Variant,
    right: &Variant,
) -> Result<(Variant, Variant), ExpressionError> {
    let target = select_type(mode, left.kind(), right.kind());
    Ok((ops.convert(left, target)?, ops.convert(right, target)?))
}

fn unsupported(operation: &'static str, kind: VariantType) -> ExpressionError {
    ExpressionError::UnsupportedOperation { operation, kind }
}

fn overflow(operation: &'static str) -> ExpressionError {
    ExpressionError::Overflow { operation }
}

/// Integer math is checked, float math follows IEEE.
struct NumericOp {
    name: &'static str,
    integer: fn(i32, i32) -> Option<i32>,
    long: fn(i64, i64) -> Option<i64>,
    float: fn(f32, f32) -> f32,
    double: fn(f64, f64) -> f64,
}

impl NumericOp {
    fn apply(&self, left: Variant, right: Variant) -> Result<Variant, ExpressionError> {
        match (left, right) {
            (Variant::Integer(a), Variant::Integer(b)) => (self.integer)(a, b)
                .map(Variant::Integer)
                .ok_or_else(|| overflow(self.name)),
            (Variant::Long(a), Variant::Long(b)) => (self.long)(a, b)
                .map(Variant::Long)
                .ok_or_else(|| overflow(self.name)),
            (Variant::Float(a), Variant::Float(b)) => Ok(Variant::Float((self.float)(a, b))),
            (Variant::Double(a), Variant::Double(b)) => Ok(Variant::Double((self.double)(a, b))),
            (left, _) => Err(unsupported(self.name, left.kind())),
        }
    }
}

fn is_zero(value: &Variant) -> bool {
    matches!(value, Variant::Integer(0) | Variant::Long(0))
}

/// DateTime/TimeSpan arithmetic. A millisecond offset may sit on either side
/// of `+`. Returns `None` for pairs with no date meaning so the caller falls
/// back to the general rules.
fn temporal<O: VariantOperations + ?Sized>(
    ops: &O,
    subtract: bool,
    left: &Variant,
    right: &Variant,
) -> Result<Option<Variant>, ExpressionError> {
    let name = if subtract { "-" } else { "+" };
    let span = |value: &Variant| -> Result<TimeDelta, ExpressionError> {
        match value {
            Variant::TimeSpan(span) => Ok(*span),
            other => ops
                .convert(other, VariantType::TimeSpan)?
                .as_timespan()
                .ok_or_else(|| unsupported(name, other.kind())),
        }
    };
    let span_like = |value: &Variant| {
        matches!(
            value,
            Variant::TimeSpan(_)
                | Variant::Integer(_)
                | Variant::Long(_)
                | Variant::Float(_)
                | Variant::Double(_)
        )
    };

    let result = match (left, right) {
        (Variant::DateTime(a), Variant::DateTime(b)) if subtract => {
            Variant::TimeSpan(a.signed_duration_since(*b))
        }
        (Variant::DateTime(date), other) if span_like(other) => {
            let offset = span(other)?;
            let moved = if subtract {
                date.checked_sub_signed(offset)
            } else {
                date.checked_add_signed(offset)
            };
            Variant::DateTime(moved.ok_or_else(|| overflow(name))?)
        }
        (other, Variant::DateTime(date)) if !subtract && span_like(other) => Variant::DateTime(
            date.checked_add_signed(span(other)?)
                .ok_or_else(|| overflow(name))?,
        ),
        (Variant::TimeSpan(a), other) if span_like(other) => {
            let b = span(other)?;
            let combined = if subtract {
                a.checked_sub(&b)
            } else {
                a.checked_add(&b)
            };
            Variant::TimeSpan(combined.ok_or_else(|| overflow(name))?)
        }
        (other, Variant::TimeSpan(b)) if !subtract && span_like(other) => Variant::TimeSpan(
            span(other)?
                .checked_add(b)
                .ok_or_else(|| overflow(name))?,
        ),
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn compare<O: VariantOperations + ?Sized>(
    ops: &O,
    operation: &'static str,
    left: &Variant,
    right: &Variant,
) -> Result<Option<Ordering>, ExpressionError> {
    let (a, b) = coerce_pair(ops, OperandMode::Comparison, left, right)?;
    match (&a, &b) {
        (Variant::Integer(a), Variant::Integer(b)) => Ok(a.partial_cmp(b)),
        (Variant::Long(a), Variant::Long(b)) => Ok(a.partial_cmp(b)),
        (Variant::Float(a), Variant::Float(b)) => Ok(a.partial_cmp(b)),
        (Variant::Double(a), Variant::Double(b)) => Ok(a.partial_cmp(b)),
        (Variant::Boolean(a), Variant::Boolean(b)) => Ok(a.partial_cmp(b)),
        (Variant::String(a), Variant::String(b)) => Ok(a.partial_cmp(b)),
        (Variant::DateTime(a), Variant::DateTime(b)) => Ok(a.partial_cmp(b)),
        (Variant::TimeSpan(a), Variant::TimeSpan(b)) => Ok(a.partial_cmp(b)),
        _ => Err(unsupported(operation, a.kind())),
    }
}

fn ordering<O: VariantOperations + ?Sized>(
    ops: &O,
    operation: &'static str,
    left: &Variant,
    right: &Variant,
    accept: fn(Ordering) -> bool,
) -> Result<Variant, ExpressionError> {
    if left.is_null() || right.is_null() {
        return Ok(Variant::Null);
    }
    let order = compare(ops, operation, left, right)?;
    Ok(Variant::Boolean(order.is_some_and(accept)))
}

fn logical<O: VariantOperations + ?Sized>(
    ops: &O,
    operation: &'static str,
    left: &Variant,
    right: &Variant,
    boolean: fn(bool, bool) -> bool,
    integer: fn(i64, i64) -> i64,
) -> Result<Variant, ExpressionError> {
    if left.is_null() || right.is_null() {
        return Ok(Variant::Null);
    }

    let mut target = select_type(OperandMode::Comparison, left.kind(), right.kind());
    if !matches!(
        target,
        VariantType::Boolean | VariantType::Integer | VariantType::Long
    ) {
        target = VariantType::Boolean;
    }

    match (ops.convert(left, target)?, ops.convert(right, target)?) {
        (Variant::Boolean(a), Variant::Boolean(b)) => Ok(Variant::Boolean(boolean(a, b))),
        (Variant::Integer(a), Variant::Integer(b)) => {
            Ok(Variant::Integer(integer(i64::from(a), i64::from(b)) as i32))
        }
        (Variant::Long(a), Variant::Long(b)) => Ok(Variant::Long(integer(a, b))),
        (value, _) => Err(unsupported(operation, value.kind())),
    }
}

fn shift<O: VariantOperations + ?Sized>(
    ops: &O,
    operation: &'static str,
    left: &Variant,
    right: &Variant,
    left_shift: bool,
) -> Result<Variant, ExpressionError> {
    if left.is_null() || right.is_null() {
        return Ok(Variant::Null);
    }

    let (a, b) = coerce_pair(ops, OperandMode::Arithmetic, left, right)?;
    let amount = match &b {
        Variant::Integer(amount) => i64::from(*amount),
        Variant::Long(amount) => *amount,
        other => return Err(unsupported(operation, other.kind())),
    };
    let amount = u32::try_from(amount).map_err(|_| {
        ExpressionError::InvalidArgument(format!("Negative shift amount {amount}"))
    })?;

    match a {
        Variant::Integer(value) => {
            let shifted = if left_shift {
                value.checked_shl(amount)
            } else {
                value.checked_shr(amount)
            };
            shifted
                .map(Variant::Integer)
                .ok_or_else(|| overflow(operation))
        }
        Variant::Long(value) => {
            let shifted = if left_shift {
                value.checked_shl(amount)
            } else {
                value.checked_shr(amount)
            };
            shifted.map(Variant::Long).ok_or_else(|| overflow(operation))
        }
        other => Err(unsupported(operation, other.kind())),
    }
}

/// Translates a SQL LIKE pattern into an anchored regular expression.
pub(crate) fn like_pattern(pattern: &str) -> String {
    let mut regex = String::from("^");
    for ch in pattern.chars() {
        match ch {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');
    regex
}

fn index_of<O: VariantOperations + ?Sized>(ops: &O, index: &Variant) -> Result<i64, ExpressionError> {
    match index {
        Variant::Integer(value) => Ok(i64::from(*value)),
        Variant::Long(value) => Ok(*value),
        other => ops
            .convert(other, VariantType::Long)?
            .as_long()
            .ok_or_else(|| unsupported("[]", other.kind())),
    }
}

/// Operator semantics over [`Variant`] values.
///
/// Implementors decide how values convert between kinds; every operator is
/// derived from that single rule.
pub trait VariantOperations {
    /// Converts `value` to `target`, or fails when this strategy does not
    /// allow the conversion.
    fn convert(&self, value: &Variant, target: VariantType) -> Result<Variant, ExpressionError>;

    fn add(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }
        if !matches!(left, Variant::String(_)) && !matches!(right, Variant::String(_)) {
            if let Some(result) = temporal(self, false, left, right)? {
                return Ok(result);
            }
        }

        match coerce_pair(self, OperandMode::Additive, left, right)? {
            (Variant::String(a), Variant::String(b)) => Ok(Variant::String(a + &b)),
            (a, b) => NumericOp {
                name: "+",
                integer: i32::checked_add,
                long: i64::checked_add,
                float: |a, b| a + b,
                double: |a, b| a + b,
            }
            .apply(a, b),
        }
    }

    fn sub(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }
        if let Some(result) = temporal(self, true, left, right)? {
            return Ok(result);
        }

        let (a, b) = coerce_pair(self, OperandMode::Arithmetic, left, right)?;
        NumericOp {
            name: "-",
            integer: i32::checked_sub,
            long: i64::checked_sub,
            float: |a, b| a - b,
            double: |a, b| a - b,
        }
        .apply(a, b)
    }

    fn mul(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }

        let (a, b) = coerce_pair(self, OperandMode::Arithmetic, left, right)?;
        NumericOp {
            name: "*",
            integer: i32::checked_mul,
            long: i64::checked_mul,
            float: |a, b| a * b,
            double: |a, b| a * b,
        }
        .apply(a, b)
    }

    fn div(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }

        let (a, b) = coerce_pair(self, OperandMode::Arithmetic, left, right)?;
        if is_zero(&b) {
            return Err(ExpressionError::DivisionByZero);
        }
        NumericOp {
            name: "/",
            integer: i32::checked_div,
            long: i64::checked_div,
            float: |a, b| a / b,
            double: |a, b| a / b,
        }
        .apply(a, b)
    }

    fn modulo(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }

        let (a, b) = coerce_pair(self, OperandMode::Arithmetic, left, right)?;
        if is_zero(&b) {
            return Err(ExpressionError::DivisionByZero);
        }
        NumericOp {
            name: "%",
            integer: i32::checked_rem,
            long: i64::checked_rem,
            float: |a, b| a % b,
            double: |a, b| a % b,
        }
        .apply(a, b)
    }

    fn pow(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        if left.is_null() || right.is_null() {
            return Ok(Variant::Null);
        }

        match coerce_pair(self, OperandMode::Arithmetic, left, right)? {
            (Variant::Integer(base), Variant::Integer(exponent)) if exponent >= 0 => base
                .checked_pow(exponent as u32)
                .map(Variant::Integer)
                .ok_or_else(|| overflow("^")),
            (Variant::Long(base), Variant::Long(exponent)) if exponent >= 0 => {
                u32::try_from(exponent)
                    .ok()
                    .and_then(|exponent| base.checked_pow(exponent))
                    .map(Variant::Long)
                    .ok_or_else(|| overflow("^"))
            }
            (Variant::Float(base), Variant::Float(exponent)) => {
                Ok(Variant::Float(base.powf(exponent)))
            }
            (a, b) => match (a.to_f64(), b.to_f64()) {
                (Some(base), Some(exponent)) => Ok(Variant::Double(base.powf(exponent))),
                _ => Err(unsupported("^", a.kind())),
            },
        }
    }

    fn lsh(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        shift(self, "<<", left, right, true)
    }

    fn rsh(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        shift(self, ">>", left, right, false)
    }

    fn and(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        logical(self, "AND", left, right, |a, b| a && b, |a, b| a & b)
    }

    fn or(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        logical(self, "OR", left, right, |a, b| a || b, |a, b| a | b)
    }

    fn xor(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        logical(self, "XOR", left, right, |a, b| a ^ b, |a, b| a ^ b)
    }

    fn not(&self, value: &Variant) -> Result<Variant, ExpressionError> {
        match value {
            Variant::Null => Ok(Variant::Null),
            Variant::Boolean(value) => Ok(Variant::Boolean(!value)),
            Variant::Integer(value) => Ok(Variant::Integer(!value)),
            Variant::Long(value) => Ok(Variant::Long(!value)),
            other => match self.convert(other, VariantType::Boolean)? {
                Variant::Boolean(value) => Ok(Variant::Boolean(!value)),
                _ => Err(unsupported("NOT", other.kind())),
            },
        }
    }

    fn negative(&self, value: &Variant) -> Result<Variant, ExpressionError> {
        match value {
            Variant::Null => Ok(Variant::Null),
            Variant::Integer(value) => value
                .checked_neg()
                .map(Variant::Integer)
                .ok_or_else(|| overflow("-")),
            Variant::Long(value) => value
                .checked_neg()
                .map(Variant::Long)
                .ok_or_else(|| overflow("-")),
            Variant::Float(value) => Ok(Variant::Float(-value)),
            Variant::Double(value) => Ok(Variant::Double(-value)),
            Variant::TimeSpan(value) => Ok(Variant::TimeSpan(-*value)),
            other => match self.convert(other, VariantType::Double)? {
                Variant::Double(value) => Ok(Variant::Double(-value)),
                _ => Err(unsupported("-", other.kind())),
            },
        }
    }

    fn equal(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        match (left.is_null(), right.is_null()) {
            (true, true) => return Ok(Variant::Boolean(true)),
            (true, false) | (false, true) => return Ok(Variant::Boolean(false)),
            (false, false) => {}
        }
        let (a, b) = coerce_pair(self, OperandMode::Comparison, left, right)?;
        Ok(Variant::Boolean(a == b))
    }

    fn not_equal(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        match self.equal(left, right)? {
            Variant::Boolean(value) => Ok(Variant::Boolean(!value)),
            other => Ok(other),
        }
    }

    fn more(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        ordering(self, ">", left, right, Ordering::is_gt)
    }

    fn less(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        ordering(self, "<", left, right, Ordering::is_lt)
    }

    fn more_equal(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        ordering(self, ">=", left, right, Ordering::is_ge)
    }

    fn less_equal(&self, left: &Variant, right: &Variant) -> Result<Variant, ExpressionError> {
        ordering(self, "<=", left, right, Ordering::is_le)
    }

    /// True when `collection` (an Array) holds an element equal to `value`.
    /// Elements that cannot be compared with `value` do not match.
    fn is_in(&self, value: &Variant, collection: &Variant) -> Result<Variant, ExpressionError> {
        let Variant::Array(elements) = collection else {
            return Err(unsupported("IN", collection.kind()));
        };
        let found = elements.iter().any(|element| {
            matches!(self.equal(value, element), Ok(Variant::Boolean(true)))
        });
        Ok(Variant::Boolean(found))
    }

    /// 0-based element of an Array, or character of a String.
    fn get_element(&self, collection: &Variant, index: &Variant) -> Result<Variant, ExpressionError> {
        if collection.is_null() {
            return Ok(Variant::Null);
        }
        let position = index_of(self, index)?;
        let length = collection.length();
        let out_of_range = ExpressionError::IndexOutOfRange {
            index: position,
            length,
        };
        let slot = usize::try_from(position).map_err(|_| out_of_range.clone())?;

        match collection {
            Variant::Array(values) => values.get(slot).cloned().ok_or(out_of_range),
            Variant::String(text) => text
                .chars()
                .nth(slot)
                .map(|ch| Variant::String(ch.to_string()))
                .ok_or(out_of_range),
            other => Err(unsupported("[]", other.kind())),
        }
    }

    /// SQL LIKE: `%` matches any run, `_` one character, case-insensitive.
    fn like(&self, value: &Variant, pattern: &Variant) -> Result<Variant, ExpressionError> {
        if value.is_null() || pattern.is_null() {
            return Ok(Variant::Null);
        }
        let text = self.convert(value, VariantType::String)?;
        let pattern = self.convert(pattern, VariantType::String)?;
        let (Some(text), Some(pattern)) = (text.as_string(), pattern.as_string()) else {
            return Err(unsupported("LIKE", value.kind()));
        };

        let regex = RegexBuilder::new(&like_pattern(pattern))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|err| ExpressionError::InvalidArgument(err.to_string()))?;
        Ok(Variant::Boolean(regex.is_match(text)))
    }
}

#[test]
fn test_select_type_ladder() {
    use VariantType::*;
    assert_eq!(select_type(OperandMode::Arithmetic, Integer, Double), Double);
    assert_eq!(select_type(OperandMode::Arithmetic, Boolean, Integer), Integer);
    assert_eq!(select_type(OperandMode::Additive, String, Integer), String);
    assert_eq!(select_type(OperandMode::Arithmetic, String, Long), Long);
    assert_eq!(select_type(OperandMode::Arithmetic, String, String), Double);
    assert_eq!(select_type(OperandMode::Comparison, String, String), String);
    assert_eq!(select_type(OperandMode::Comparison, Array, Boolean), Array);
}

#[test]
fn test_like_pattern_escapes_regex_chars() {
    assert_eq!(like_pattern("a.b%"), "^a\\.b.*$");
    assert_eq!(like_pattern("_x"), "^.x$");
}
