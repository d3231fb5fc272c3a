//! Evaluate an expression against JSON variables

use tracing::debug;

use super::{json_to_variant, variant_to_json, CliError};
use crate::{ExpressionCalculator, TypeSafeOperations, Variant};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The expression to evaluate
    pub expression: String,
    /// JSON object mapping variable names to values
    pub variables: Option<String>,
    /// Use the strict, non-coercing operations
    pub strict: bool,
}

/// Result of an eval operation
#[derive(Debug)]
pub struct EvalResult {
    pub value: Variant,
    pub output: serde_json::Value,
}

/// Execute an eval operation
///
/// Variables named in the expression but absent from the JSON object
/// evaluate as null.
pub fn execute_eval(options: &EvalOptions) -> Result<EvalResult, CliError> {
    let mut calculator = ExpressionCalculator::with_expression(&options.expression)?;
    if options.strict {
        calculator.set_operations(TypeSafeOperations);
    }

    if let Some(json_str) = &options.variables {
        let map = match serde_json::from_str(json_str)? {
            serde_json::Value::Object(map) => map,
            other => return Err(CliError::InvalidVariables(json_kind(&other))),
        };
        for (name, value) in map {
            calculator
                .default_variables_mut()
                .set_value(&name, json_to_variant(value));
        }
    }

    debug!(
        expression = %options.expression,
        variables = calculator.default_variables().len(),
        strict = options.strict,
        "evaluating"
    );
    let value = calculator.evaluate()?;
    let output = variant_to_json(&value);
    Ok(EvalResult { value, output })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
