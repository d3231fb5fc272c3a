//! Show the token streams an expression goes through

use std::str::FromStr;

use super::CliError;
use crate::ExpressionParser;

/// Which token stream to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenStage {
    /// Raw tokenizer output
    Original,
    /// Typed tokens before reordering
    Initial,
    /// Evaluation order
    #[default]
    Postfix,
}

impl FromStr for TokenStage {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "original" | "raw" => Ok(Self::Original),
            "initial" | "typed" => Ok(Self::Initial),
            "postfix" | "result" | "rpn" => Ok(Self::Postfix),
            _ => Err(CliError::UnknownStage(s.to_string())),
        }
    }
}

/// A rendered token stream plus the variables the expression references
#[derive(Debug, Clone, PartialEq)]
pub struct TokenListing {
    pub tokens: Vec<String>,
    pub variables: Vec<String>,
}

pub fn inspect_tokens(expression: &str, stage: TokenStage) -> Result<TokenListing, CliError> {
    let parser = ExpressionParser::parse(expression)?;

    let tokens = match stage {
        TokenStage::Original => parser.original_tokens().iter().map(ToString::to_string).collect(),
        TokenStage::Initial => parser.initial_tokens().iter().map(ToString::to_string).collect(),
        TokenStage::Postfix => parser.result_tokens().iter().map(ToString::to_string).collect(),
    };

    Ok(TokenListing {
        tokens,
        variables: parser.variable_names().to_vec(),
    })
}
