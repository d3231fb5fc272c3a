use tracing::{debug, warn};

use crate::ast::{ExpressionToken, ExpressionTokenType};
use crate::error::{ExpressionError, SyntaxError};
use crate::functions::{FunctionCollection, FunctionRegistry};
use crate::operations::{TypeUnsafeOperations, VariantOperations};
use crate::parser::ExpressionParser;
use crate::stack::CalculationStack;
use crate::tokenizer::Token;
use crate::value::Variant;
use crate::variables::{Variable, VariableCollection, VariableRegistry};

/// Parses an expression once and evaluates it any number of times.
///
/// The calculator owns a default variable collection and the built-in
/// function library; both can be replaced per call. Variables referenced by
/// the expression are added to the default collection as Nulls when
/// `auto_variables` is set.
///
/// # Examples
///
/// ```
/// use exprcalc::{ExpressionCalculator, Variant};
///
/// let mut calculator = ExpressionCalculator::with_expression("A + b / (3 - Max(-123, 1)*2)").unwrap();
/// calculator.default_variables_mut().set_value("a", "xyz");
/// calculator.default_variables_mut().set_value("B", 123);
///
/// assert_eq!(calculator.evaluate().unwrap(), Variant::from("xyz123"));
/// ```
///
/// Registries are not synchronized; evaluating from several threads while
/// mutating the same calculator is the caller's to coordinate.
pub struct ExpressionCalculator {
    parser: ExpressionParser,
    default_variables: VariableCollection,
    default_functions: FunctionCollection,
    operations: Box<dyn VariantOperations>,
    /// Create missing variables in the default collection on parse.
    pub auto_variables: bool,
}

impl ExpressionCalculator {
    pub fn new() -> Self {
        ExpressionCalculator {
            parser: ExpressionParser::new(),
            default_variables: VariableCollection::new(),
            default_functions: FunctionCollection::default_functions(),
            operations: Box::new(TypeUnsafeOperations),
            auto_variables: true,
        }
    }

    pub fn with_expression(expression: &str) -> Result<Self, SyntaxError> {
        let mut calculator = ExpressionCalculator::new();
        calculator.set_expression(expression)?;
        Ok(calculator)
    }

    pub fn expression(&self) -> &str {
        self.parser.expression()
    }

    pub fn set_expression(&mut self, expression: &str) -> Result<(), SyntaxError> {
        self.parser.set_expression(expression)?;
        self.after_parse();
        Ok(())
    }

    pub fn set_original_tokens(&mut self, tokens: Vec<Token>) -> Result<(), SyntaxError> {
        self.parser.set_original_tokens(tokens)?;
        self.after_parse();
        Ok(())
    }

    fn after_parse(&mut self) {
        if self.auto_variables {
            let mut variables = std::mem::take(&mut self.default_variables);
            self.create_variables(&mut variables);
            self.default_variables = variables;
        }
    }

    pub fn original_tokens(&self) -> &[Token] {
        self.parser.original_tokens()
    }

    pub fn initial_tokens(&self) -> &[ExpressionToken] {
        self.parser.initial_tokens()
    }

    pub fn result_tokens(&self) -> &[ExpressionToken] {
        self.parser.result_tokens()
    }

    pub fn variable_names(&self) -> &[String] {
        self.parser.variable_names()
    }

    pub fn default_variables(&self) -> &VariableCollection {
        &self.default_variables
    }

    pub fn default_variables_mut(&mut self) -> &mut VariableCollection {
        &mut self.default_variables
    }

    pub fn default_functions(&self) -> &FunctionCollection {
        &self.default_functions
    }

    pub fn default_functions_mut(&mut self) -> &mut FunctionCollection {
        &mut self.default_functions
    }

    pub fn operations(&self) -> &dyn VariantOperations {
        self.operations.as_ref()
    }

    /// Swaps the conversion strategy used by operators and functions.
    pub fn set_operations(&mut self, operations: impl VariantOperations + 'static) {
        self.operations = Box::new(operations);
    }

    /// Adds a Null variable to `variables` for every referenced name that is
    /// not there yet.
    pub fn create_variables(&self, variables: &mut VariableCollection) {
        for name in self.parser.variable_names() {
            if variables.find_by_name(name).is_none() {
                debug!(name = %name, "creating variable");
                variables.add(Variable::new(name.as_str(), Variant::Null));
            }
        }
    }

    /// Drops the expression and the default variables.
    pub fn clear(&mut self) {
        self.parser.clear();
        self.default_variables.clear();
    }

    pub fn evaluate(&self) -> Result<Variant, ExpressionError> {
        self.evaluate_with_variables_and_functions(&self.default_variables, &self.default_functions)
    }

    pub fn evaluate_with_variables(
        &self,
        variables: &dyn VariableRegistry,
    ) -> Result<Variant, ExpressionError> {
        self.evaluate_with_variables_and_functions(variables, &self.default_functions)
    }

    pub fn evaluate_with_variables_and_functions(
        &self,
        variables: &dyn VariableRegistry,
        functions: &dyn FunctionRegistry,
    ) -> Result<Variant, ExpressionError> {
        let tokens = self.parser.result_tokens();
        if tokens.is_empty() {
            return Err(ExpressionError::EmptyExpression);
        }

        let mut stack = CalculationStack::new();
        for token in tokens {
            self.evaluate_token(token, &mut stack, variables, functions)?;
        }

        if stack.len() != 1 {
            warn!(depth = stack.len(), expression = %self.expression(), "unbalanced evaluation stack");
            return Err(internal(
                format!("Evaluation left {} values on the stack", stack.len()),
                tokens.last(),
            ));
        }
        stack
            .pop()
            .ok_or_else(|| internal("Evaluation stack is empty", tokens.last()))
    }

    fn evaluate_token(
        &self,
        token: &ExpressionToken,
        stack: &mut CalculationStack,
        variables: &dyn VariableRegistry,
        functions: &dyn FunctionRegistry,
    ) -> Result<(), ExpressionError> {
        let ops = self.operations.as_ref();

        let result = match token.kind {
            ExpressionTokenType::Constant => token.value.clone(),
            ExpressionTokenType::Variable => {
                let name = token.name().unwrap_or_default();
                let variable = variables.find_by_name(name).ok_or_else(|| {
                    ExpressionError::VariableNotFound {
                        name: name.to_string(),
                        position: token.position(),
                    }
                })?;
                variable.value.clone()
            }
            ExpressionTokenType::Function => {
                let name = token.name().unwrap_or_default();
                let function = functions.find_by_name(name).ok_or_else(|| {
                    ExpressionError::FunctionNotFound {
                        name: name.to_string(),
                        position: token.position(),
                    }
                })?;
                let args = stack.pop_many(token.arguments).ok_or_else(|| {
                    internal(
                        format!("{name} expects {} arguments on the stack", token.arguments),
                        Some(token),
                    )
                })?;
                function.calculate(&args, ops).map_err(|err| {
                    debug!(function = %name, error = %err, "function failed");
                    ExpressionError::FunctionFailed {
                        name: name.to_string(),
                        position: token.position(),
                        source: Box::new(err),
                    }
                })?
            }
            kind if kind.is_unary_operator() => {
                let value = pop_operand(stack, token)?;
                let applied = match kind {
                    ExpressionTokenType::Unary => ops.negative(&value),
                    ExpressionTokenType::Not => ops.not(&value),
                    ExpressionTokenType::IsNull => Ok(Variant::Boolean(value.is_null())),
                    _ => Ok(Variant::Boolean(!value.is_null())),
                };
                applied.inspect_err(|err| log_operator_failure(token, err))?
            }
            kind if kind.is_binary_operator() => {
                let right = pop_operand(stack, token)?;
                let left = pop_operand(stack, token)?;
                apply_binary(ops, kind, &left, &right)
                    .inspect_err(|err| log_operator_failure(token, err))?
            }
            kind => {
                return Err(internal(
                    format!("Token {kind:?} cannot be evaluated"),
                    Some(token),
                ));
            }
        };

        stack.push(result);
        Ok(())
    }
}

impl Default for ExpressionCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_binary(
    ops: &dyn VariantOperations,
    kind: ExpressionTokenType,
    left: &Variant,
    right: &Variant,
) -> Result<Variant, ExpressionError> {
    use ExpressionTokenType::*;
    match kind {
        Plus => ops.add(left, right),
        Minus => ops.sub(left, right),
        Star => ops.mul(left, right),
        Slash => ops.div(left, right),
        Procent => ops.modulo(left, right),
        Power => ops.pow(left, right),
        ShiftLeft => ops.lsh(left, right),
        ShiftRight => ops.rsh(left, right),
        Equal => ops.equal(left, right),
        NotEqual => ops.not_equal(left, right),
        More => ops.more(left, right),
        Less => ops.less(left, right),
        EqualMore => ops.more_equal(left, right),
        EqualLess => ops.less_equal(left, right),
        And => ops.and(left, right),
        Or => ops.or(left, right),
        Xor => ops.xor(left, right),
        In => ops.is_in(left, right),
        NotIn => ops.is_in(left, right).map(negate),
        Like => ops.like(left, right),
        NotLike => ops.like(left, right).map(negate),
        Element => ops.get_element(left, right),
        other => Err(ExpressionError::Internal {
            message: format!("{other:?} is not a binary operator"),
            position: Default::default(),
        }),
    }
}

fn negate(value: Variant) -> Variant {
    match value {
        Variant::Boolean(flag) => Variant::Boolean(!flag),
        other => other,
    }
}

fn pop_operand(
    stack: &mut CalculationStack,
    token: &ExpressionToken,
) -> Result<Variant, ExpressionError> {
    stack.pop().ok_or_else(|| {
        internal(
            format!("Missing operand for {:?}", token.kind),
            Some(token),
        )
    })
}

fn internal(message: impl Into<String>, token: Option<&ExpressionToken>) -> ExpressionError {
    let message = message.into();
    warn!(%message, "internal evaluation error");
    ExpressionError::Internal {
        message,
        position: token.map(ExpressionToken::position).unwrap_or_default(),
    }
}

fn log_operator_failure(token: &ExpressionToken, err: &ExpressionError) {
    debug!(
        operator = ?token.kind,
        line = token.line,
        column = token.column,
        error = %err,
        "operator failed"
    );
}
