//! Lexical rules of the expression language, layered over the generic
//! tokenizer framework.
//!
//! Differences from the generic tokenizer:
//! - `-` is always a symbol, so `3-1` reads as `3`, `-`, `1`
//! - numbers accept a scientific suffix (`123e45`, `543.11E+43`)
//! - `AND OR XOR NOT IN IS NULL LIKE TRUE FALSE` are keywords
//! - double-quoted text is a quoted identifier and comes out as a `Word`
//! - `/* */` and `//` comments, and the symbols `<= >= <> != >> <<`

use crate::error::SyntaxError;
use crate::reader::PushbackReader;
use crate::tokenizer::number::read_digits;
use crate::tokenizer::{
    CppCommentState, GenericNumberState, GenericQuoteState, StateKind, SymbolState, Token,
    TokenKind, Tokenizer, TokenizerState, TokenizerStates, WhitespaceState, WordState,
    decode_string,
};

/// Reserved words, matched case-insensitively.
pub const KEYWORDS: [&str; 10] = [
    "AND", "OR", "XOR", "NOT", "IN", "IS", "NULL", "LIKE", "TRUE", "FALSE",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.iter().any(|keyword| keyword.eq_ignore_ascii_case(word))
}

/// Generic number rules plus an optional exponent. A leading `-` is
/// treated as an operator.
pub struct ExpressionNumberState;

impl TokenizerState for ExpressionNumberState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        states: &TokenizerStates,
    ) -> Result<Token, SyntaxError> {
        if reader.peek() == Some('-') {
            return states.symbol.next_token(reader, states);
        }

        let token = GenericNumberState.next_token(reader, states)?;
        if !matches!(token.kind, TokenKind::Integer | TokenKind::Float) {
            return Ok(token);
        }

        let Some(exponent) = reader.peek().filter(|ch| matches!(ch, 'e' | 'E')) else {
            return Ok(token);
        };
        reader.read();
        let mut suffix = String::from(exponent);

        if let Some(sign) = reader.peek().filter(|ch| matches!(ch, '+' | '-')) {
            reader.read();
            suffix.push(sign);
        }

        // `1e` or `3E-` without digits: give the speculative characters back
        if !reader.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            reader.pushback_str(&suffix);
            return Ok(token);
        }

        read_digits(reader, &mut suffix);
        Ok(Token::new(TokenKind::Float, token.value + &suffix))
    }
}

/// Words, with reserved words reported as `Keyword`.
pub struct ExpressionWordState {
    words: WordState,
}

impl ExpressionWordState {
    pub fn new() -> Self {
        ExpressionWordState {
            words: WordState::new(),
        }
    }
}

impl Default for ExpressionWordState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for ExpressionWordState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        states: &TokenizerStates,
    ) -> Result<Token, SyntaxError> {
        let mut token = self.words.next_token(reader, states)?;
        if is_keyword(&token.value) {
            token.kind = TokenKind::Keyword;
        }
        Ok(token)
    }
}

/// Single quotes delimit string literals; double quotes delimit identifiers.
pub struct ExpressionQuoteState;

impl TokenizerState for ExpressionQuoteState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        states: &TokenizerStates,
    ) -> Result<Token, SyntaxError> {
        if reader.peek() == Some('"') {
            let raw = GenericQuoteState::read_quoted(reader)?;
            return Ok(Token::new(TokenKind::Word, decode_string(&raw, '"')));
        }
        GenericQuoteState.next_token(reader, states)
    }
}

impl TokenizerStates {
    /// States and dispatch table of the expression language.
    pub fn expression() -> Self {
        let mut symbol = SymbolState::new();
        for value in ["<=", ">=", "<>", "!=", ">>", "<<"] {
            symbol.add(value, TokenKind::Symbol);
        }

        let mut states = TokenizerStates::new();
        states.whitespace = Box::new(WhitespaceState::new());
        states.word = Box::new(ExpressionWordState::new());
        states.number = Box::new(ExpressionNumberState);
        states.quote = Box::new(ExpressionQuoteState);
        states.comment = Box::new(CppCommentState);
        states.symbol = Box::new(symbol);

        states.set_char_state(0x00, 0xFF, StateKind::Symbol);
        states.set_char_state(0x00, ' ' as u32, StateKind::Whitespace);
        states.set_char_state('a' as u32, 'z' as u32, StateKind::Word);
        states.set_char_state('A' as u32, 'Z' as u32, StateKind::Word);
        states.set_char_state('_' as u32, '_' as u32, StateKind::Word);
        states.set_char_state(0xC0, 0xFFFE, StateKind::Word);
        states.set_char_state('0' as u32, '9' as u32, StateKind::Number);
        states.set_char_state('.' as u32, '.' as u32, StateKind::Number);
        states.set_char_state('"' as u32, '"' as u32, StateKind::Quote);
        states.set_char_state('\'' as u32, '\'' as u32, StateKind::Quote);
        states.set_char_state('/' as u32, '/' as u32, StateKind::Comment);
        states
    }
}

impl Tokenizer {
    /// Tokenizer for expression text. Nothing is skipped or decoded by
    /// default.
    pub fn expression() -> Self {
        Tokenizer::new(TokenizerStates::expression())
    }
}

#[test]
fn test_keywords_ignore_case() {
    assert!(is_keyword("and"));
    assert!(is_keyword("Null"));
    assert!(!is_keyword("Max"));
}
