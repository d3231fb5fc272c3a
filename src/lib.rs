pub mod ast;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod lexer;
pub mod operations;
pub mod parser;
pub mod reader;
pub mod stack;
pub mod tokenizer;
pub mod value;
pub mod variables;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{ExpressionToken, ExpressionTokenType};
pub use error::{ExpressionError, SyntaxError, SyntaxErrorCode};
pub use evaluator::ExpressionCalculator;
pub use functions::{DelegatedFunction, Function, FunctionCollection, FunctionRegistry};
pub use operations::{TypeSafeOperations, TypeUnsafeOperations, VariantOperations};
pub use parser::ExpressionParser;
pub use reader::{Position, PushbackReader};
pub use stack::CalculationStack;
pub use tokenizer::{Token, TokenKind, Tokenizer, TokenizerStates};
pub use value::{Variant, VariantType};
pub use variables::{Variable, VariableCollection, VariableRegistry};
