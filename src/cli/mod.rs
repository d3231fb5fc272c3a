//! CLI support for exprcalc
//!
//! Provides programmatic access to the `exprcalc` commands so hosts can run
//! the same evaluation and token inspection the binary does.

mod convert;
mod eval;
mod inspect;

pub use convert::{json_to_variant, variant_to_json};
pub use eval::{execute_eval, EvalOptions, EvalResult};
pub use inspect::{inspect_tokens, TokenListing, TokenStage};

use std::io;

use thiserror::Error;

use crate::error::{ExpressionError, SyntaxError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Syntax error [{code}]: {0}", code = .0.code)]
    Syntax(#[from] SyntaxError),

    #[error("Evaluation error [{code}]: {0}", code = .0.code())]
    Eval(#[from] ExpressionError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// `--vars` parsed but was not a JSON object.
    #[error("Variables must be a JSON object, found {0}")]
    InvalidVariables(&'static str),

    #[error("Unknown token stage: '{0}'\nExpected one of: original, initial, postfix")]
    UnknownStage(String),
}
