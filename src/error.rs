//! Error types for the parse and evaluation phases.

use thiserror::Error;

use crate::reader::Position;
use crate::value::VariantType;

/// Error codes reported by the tokenizer and the expression parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorCode {
    UnknownSymbol,
    UnknownCharacter,
    UnterminatedString,
    MissedCloseParenthesis,
    UnexpectedCloseParenthesis,
    MissedCloseSquareBracket,
    UnexpectedCloseSquareBracket,
    CommaOutsideCall,
    MissingOperand,
    MissingOperator,
    UnexpectedEnd,
    InvalidNumber,
    Internal,
}

impl SyntaxErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntaxErrorCode::UnknownSymbol => "UNKNOWN_SYMBOL",
            SyntaxErrorCode::UnknownCharacter => "UNKNOWN_CHARACTER",
            SyntaxErrorCode::UnterminatedString => "UNTERMINATED_STRING",
            SyntaxErrorCode::MissedCloseParenthesis => "MISSED_CLOSE_PARENTHESIS",
            SyntaxErrorCode::UnexpectedCloseParenthesis => "UNEXPECTED_CLOSE_PARENTHESIS",
            SyntaxErrorCode::MissedCloseSquareBracket => "MISSED_CLOSE_SQUARE_BRACKET",
            SyntaxErrorCode::UnexpectedCloseSquareBracket => "UNEXPECTED_CLOSE_SQUARE_BRACKET",
            SyntaxErrorCode::CommaOutsideCall => "COMMA_OUTSIDE_CALL",
            SyntaxErrorCode::MissingOperand => "MISSING_OPERAND",
            SyntaxErrorCode::MissingOperator => "MISSING_OPERATOR",
            SyntaxErrorCode::UnexpectedEnd => "UNEXPECTED_END",
            SyntaxErrorCode::InvalidNumber => "INVALID_NUMBER",
            SyntaxErrorCode::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for SyntaxErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised while tokenizing or parsing. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct SyntaxError {
    pub code: SyntaxErrorCode,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(code: SyntaxErrorCode, message: impl Into<String>, position: Position) -> Self {
        SyntaxError {
            code,
            message: message.into(),
            line: position.line,
            column: position.column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// Raised while evaluating a parsed expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("Variable {name} was not found at {position}")]
    VariableNotFound { name: String, position: Position },

    #[error("Function {name} was not found at {position}")]
    FunctionNotFound { name: String, position: Position },

    #[error("Function {name} failed at {position}: {source}")]
    FunctionFailed {
        name: String,
        position: Position,
        #[source]
        source: Box<ExpressionError>,
    },

    #[error("Expected {expected} parameters but found {actual}")]
    WrongParamCount { expected: String, actual: usize },

    #[error("Cannot convert {from} to {to}: {message}")]
    Conversion {
        from: VariantType,
        to: VariantType,
        message: String,
    },

    #[error("Operation '{operation}' is not supported for type {kind}")]
    UnsupportedOperation {
        operation: &'static str,
        kind: VariantType,
    },

    #[error("Index {index} is out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow in '{operation}'")]
    Overflow { operation: &'static str },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Expression is empty")]
    EmptyExpression,

    #[error("Internal error at {position}: {message}")]
    Internal { message: String, position: Position },
}

impl ExpressionError {
    /// Stable upper-case code for the error category.
    pub fn code(&self) -> &'static str {
        match self {
            ExpressionError::VariableNotFound { .. } => "VAR_NOT_FOUND",
            ExpressionError::FunctionNotFound { .. } => "FUNC_NOT_FOUND",
            ExpressionError::FunctionFailed { .. } => "FUNC_FAILED",
            ExpressionError::WrongParamCount { .. } => "WRONG_PARAM_COUNT",
            ExpressionError::Conversion { .. } => "CONVERSION",
            ExpressionError::UnsupportedOperation { .. } => "UNSUPPORTED_OPERATION",
            ExpressionError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            ExpressionError::DivisionByZero => "DIVISION_BY_ZERO",
            ExpressionError::Overflow { .. } => "OVERFLOW",
            ExpressionError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ExpressionError::EmptyExpression => "EMPTY_EXPRESSION",
            ExpressionError::Internal { .. } => "INTERNAL",
        }
    }

    /// Source position when the error is tied to a token.
    pub fn position(&self) -> Option<Position> {
        match self {
            ExpressionError::VariableNotFound { position, .. }
            | ExpressionError::FunctionNotFound { position, .. }
            | ExpressionError::FunctionFailed { position, .. }
            | ExpressionError::Internal { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// True for consistency failures that indicate a defect rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, ExpressionError::Internal { .. })
    }

    pub(crate) fn conversion(from: VariantType, to: VariantType, message: impl Into<String>) -> Self {
        ExpressionError::Conversion {
            from,
            to,
            message: message.into(),
        }
    }

    pub(crate) fn wrong_param_count(expected: impl Into<String>, actual: usize) -> Self {
        ExpressionError::WrongParamCount {
            expected: expected.into(),
            actual,
        }
    }
}
