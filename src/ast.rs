//! # Expression token model
//!
//! The parser turns raw lexical tokens into typed [`ExpressionToken`]s and
//! arranges them in postfix (reverse-Polish) order, so evaluation is a single
//! left-to-right walk over a value stack with no tree in between.
//!
//! - **[tokens]** - token kinds and the token type itself
//! - **[operators]** - precedence and associativity of operators
//!
//! ## Example
//!
//! ```text
//! A + b / (3 - Max(-123, 1) * 2)
//! ```
//!
//! becomes
//!
//! ```text
//! A b 3 123 Unary 1 Max/2 2 * - / +
//! ```
//!
//! where `Max/2` is a function token that consumes two arguments.
pub mod operators;
pub mod tokens;

pub use operators::{Associativity, associativity, precedence};
pub use tokens::{ExpressionToken, ExpressionTokenType};
