// tests/function_tests.rs

use chrono::{Datelike, TimeDelta, TimeZone, Utc};
use exprcalc::{
    DelegatedFunction, ExpressionCalculator, ExpressionError, FunctionCollection,
    TypeSafeOperations, Variant,
};

fn eval(expression: &str) -> Result<Variant, ExpressionError> {
    ExpressionCalculator::with_expression(expression)
        .unwrap()
        .evaluate()
}

fn eval_strict(expression: &str) -> Result<Variant, ExpressionError> {
    let mut calculator = ExpressionCalculator::with_expression(expression).unwrap();
    calculator.set_operations(TypeSafeOperations);
    calculator.evaluate()
}

fn inner_error(expression: &str) -> ExpressionError {
    match eval(expression) {
        Err(ExpressionError::FunctionFailed { source, .. }) => *source,
        other => panic!("Expected a function failure for {}, got {:?}", expression, other),
    }
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_default_library_lookup_ignores_case() {
    let functions = FunctionCollection::default_functions();
    assert!(functions.find_by_name("sum").is_some());
    assert!(functions.find_by_name("SQRT").is_some());
    assert!(functions.find_by_name("nope").is_none());
    assert!(functions.names().contains(&"DayOfWeek"));
}

#[test]
fn test_add_replaces_and_remove() {
    let mut functions = FunctionCollection::new();
    functions.add(DelegatedFunction::new("One", |_, _| Ok(Variant::from(1))));
    functions.add(DelegatedFunction::new("ONE", |_, _| Ok(Variant::from(2))));
    assert_eq!(functions.len(), 1);

    assert!(functions.remove("one").is_some());
    assert!(functions.is_empty());
}

// ============================================================================
// Aggregates and Conditionals
// ============================================================================

#[test]
fn test_sum_min_max() {
    assert_eq!(eval("Sum(1, 2, 3)"), Ok(Variant::Integer(6)));
    assert_eq!(eval("sum(1, 2.5)"), Ok(Variant::Float(3.5)));
    assert_eq!(eval("Min(3, -1, 2)"), Ok(Variant::Integer(-1)));
    assert_eq!(eval("Max('a', 'c', 'b')"), Ok(Variant::from("c")));
}

#[test]
fn test_wrong_param_count() {
    assert_eq!(
        inner_error("Sum(1)"),
        ExpressionError::WrongParamCount {
            expected: "at least 2".to_string(),
            actual: 1
        }
    );
    assert!(matches!(
        inner_error("Sqrt(1, 2)"),
        ExpressionError::WrongParamCount { actual: 2, .. }
    ));
}

#[test]
fn test_if_and_choose() {
    assert_eq!(eval("If(1 > 0, 'yes', 'no')"), Ok(Variant::from("yes")));
    assert_eq!(eval("If(NULL, 'yes', 'no')"), Ok(Variant::from("no")));
    assert_eq!(eval("Choose(2, 'a', 'b', 'c')"), Ok(Variant::from("b")));
    assert!(matches!(
        inner_error("Choose(0, 'a', 'b')"),
        ExpressionError::InvalidArgument(_)
    ));
    assert!(matches!(
        inner_error("Choose(5, 'a', 'b')"),
        ExpressionError::WrongParamCount { .. }
    ));
}

// ============================================================================
// Math
// ============================================================================

#[test]
fn test_math_functions() {
    assert_eq!(eval("Abs(-3)"), Ok(Variant::Integer(3)));
    assert_eq!(eval("Abs(-2.5)"), Ok(Variant::Float(2.5)));
    assert_eq!(eval("Sqrt(16)"), Ok(Variant::Double(4.0)));
    assert_eq!(eval("Sqr(9)"), Ok(Variant::Double(3.0)));
    assert_eq!(eval("Floor(2.7)"), Ok(Variant::Double(2.0)));
    assert_eq!(eval("Ceiling(2.1)"), Ok(Variant::Double(3.0)));
    assert_eq!(eval("Ln(1)"), Ok(Variant::Double(0.0)));
    assert_eq!(eval("Pi()"), Ok(Variant::Double(std::f64::consts::PI)));
    assert_eq!(eval("E()"), Ok(Variant::Double(std::f64::consts::E)));
    assert_eq!(eval("Sqrt(NULL)"), Ok(Variant::Null));
}

#[test]
fn test_round_and_trunc() {
    assert_eq!(eval("Round(2.5)"), Ok(Variant::Double(3.0)));
    assert_eq!(eval("Round(-2.5)"), Ok(Variant::Double(-3.0)));
    assert_eq!(eval("Round(2.5, 0)"), Ok(Variant::Double(3.0)));
    assert_eq!(eval("Round(-1.5, 0)"), Ok(Variant::Double(-2.0)));
    let rounded = eval("Round(2.345, 2)").unwrap().as_double().unwrap();
    assert!((rounded - 2.35).abs() < 1e-9);
    assert_eq!(eval("Trunc(-7.9)"), Ok(Variant::Integer(-7)));
    assert_eq!(eval("Truncate(5000000000.5)"), Ok(Variant::Long(5_000_000_000)));
}

#[test]
fn test_numeric_arguments_in_strict_mode() {
    assert_eq!(eval_strict("Sqrt(4)"), Ok(Variant::Double(2.0)));
    assert_eq!(eval_strict("Sqrt(6.25)"), Ok(Variant::Double(2.5)));
    assert_eq!(eval_strict("Sin(0)"), Ok(Variant::Double(0.0)));
    assert_eq!(eval_strict("Round(2.5)"), Ok(Variant::Double(3.0)));
    assert_eq!(eval_strict("Trunc(-7.9)"), Ok(Variant::Integer(-7)));
    assert_eq!(eval_strict("Abs(-2.5)"), Ok(Variant::Float(2.5)));
    assert_eq!(eval_strict("Ticks(Date(1970, 1, 2))"), Ok(Variant::Long(86_400_000)));
    // 1970-01-01 was a Thursday
    assert_eq!(eval_strict("DayOfWeek(0)"), Ok(Variant::Integer(4)));
    assert_eq!(eval_strict("Sqrt(NULL)"), Ok(Variant::Null));
    assert_eq!(eval_strict("Sqrt('4')").unwrap_err().code(), "FUNC_FAILED");
}

#[test]
fn test_random_range() {
    for _ in 0..20 {
        let value = eval("Rnd()").unwrap().as_double().unwrap();
        assert!((0.0..1.0).contains(&value));
    }
}

// ============================================================================
// Dates
// ============================================================================

#[test]
fn test_date_constructors() {
    let expected = Utc.with_ymd_and_hms(2024, 2, 29, 13, 45, 10).unwrap();
    assert_eq!(
        eval("Date(2024, 2, 29, 13, 45, 10)"),
        Ok(Variant::DateTime(expected))
    );
    assert_eq!(
        eval("Date('2024-02-29 13:45:10')"),
        Ok(Variant::DateTime(expected))
    );
    assert!(matches!(
        inner_error("Date(2023, 2, 29)"),
        ExpressionError::InvalidArgument(_)
    ));
}

#[test]
fn test_ticks_and_day_of_week() {
    assert_eq!(eval("Ticks(Date(1970, 1, 2))"), Ok(Variant::Long(86_400_000)));
    // 2024-03-03 is a Sunday
    assert_eq!(eval("DayOfWeek(Date(2024, 3, 3))"), Ok(Variant::Integer(0)));
    assert_eq!(eval("DayOfWeek(Date(2024, 3, 6))"), Ok(Variant::Integer(3)));
}

#[test]
fn test_time_span() {
    assert_eq!(
        eval("TimeSpan(1, 30, 0)"),
        Ok(Variant::TimeSpan(TimeDelta::minutes(90)))
    );
    assert_eq!(
        eval("TimeSpan(1, 0, 0, 0, 5)"),
        Ok(Variant::TimeSpan(TimeDelta::days(1) + TimeDelta::milliseconds(5)))
    );
    assert_eq!(
        eval("Date(2024, 1, 1) + TimeSpan(2, 0, 0, 0)"),
        Ok(Variant::DateTime(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()))
    );
}

#[test]
fn test_now_is_current() {
    let value = eval("Now()").unwrap();
    let now = value.as_datetime().unwrap();
    assert!(now.year() >= 2024);
    assert!((Utc::now() - now).num_seconds().abs() < 60);
}

// ============================================================================
// Values and Strings
// ============================================================================

#[test]
fn test_empty_null_contains_array() {
    assert_eq!(eval("Empty('')"), Ok(Variant::Boolean(true)));
    assert_eq!(eval("Empty(0)"), Ok(Variant::Boolean(false)));
    assert_eq!(eval("Null()"), Ok(Variant::Null));
    assert_eq!(eval("Contains('haystack', 'st')"), Ok(Variant::Boolean(true)));
    assert_eq!(eval("Contains('', '')"), Ok(Variant::Boolean(false)));
    assert_eq!(eval("Contains(NULL, 'a')"), Ok(Variant::Boolean(false)));
    assert_eq!(
        eval("Array(1, 'a')"),
        Ok(Variant::Array(vec![Variant::from(1), Variant::from("a")]))
    );
    assert_eq!(eval("Array()"), Ok(Variant::Array(vec![])));
}
