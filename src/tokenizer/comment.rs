use crate::error::SyntaxError;
use crate::reader::PushbackReader;

use super::{Token, TokenKind, TokenizerState, TokenizerStates, incorrect_usage};

/// `#` (or whatever lead character was routed here) to end of line.
pub struct GenericCommentState;

/// `/* ... */` comments; any other `/` is handed to the symbol state.
pub struct CCommentState;

/// `/* ... */` and `// ...` comments; any other `/` is handed to the symbol
/// state.
pub struct CppCommentState;

/// Appends characters up to, not including, the end of the line.
fn read_single_line(reader: &mut PushbackReader, value: &mut String) {
    while let Some(ch) = reader.read() {
        if ch == '\n' || ch == '\r' {
            reader.pushback(ch);
            break;
        }
        value.push(ch);
    }
}

/// Appends characters through the closing `*/`, or to EOF when unterminated.
fn read_multi_line(reader: &mut PushbackReader, value: &mut String) {
    let mut last = None;
    while let Some(ch) = reader.read() {
        value.push(ch);
        if last == Some('*') && ch == '/' {
            break;
        }
        last = Some(ch);
    }
}

fn read_slash_comment(
    reader: &mut PushbackReader,
    states: &TokenizerStates,
    state: &str,
    allow_single_line: bool,
) -> Result<Token, SyntaxError> {
    match reader.read() {
        Some('/') => {}
        other => {
            reader.pushback(other);
            return Err(incorrect_usage(state, reader));
        }
    }

    match reader.read() {
        Some('*') => {
            let mut value = String::from("/*");
            read_multi_line(reader, &mut value);
            Ok(Token::new(TokenKind::Comment, value))
        }
        Some('/') if allow_single_line => {
            let mut value = String::from("//");
            read_single_line(reader, &mut value);
            Ok(Token::new(TokenKind::Comment, value))
        }
        second => {
            reader.pushback(second);
            reader.pushback('/');
            states.symbol.next_token(reader, states)
        }
    }
}

impl TokenizerState for GenericCommentState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        _states: &TokenizerStates,
    ) -> Result<Token, SyntaxError> {
        let mut value = String::new();
        read_single_line(reader, &mut value);
        Ok(Token::new(TokenKind::Comment, value))
    }
}

impl TokenizerState for CCommentState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        states: &TokenizerStates,
    ) -> Result<Token, SyntaxError> {
        read_slash_comment(reader, states, "C comment state", false)
    }
}

impl TokenizerState for CppCommentState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        states: &TokenizerStates,
    ) -> Result<Token, SyntaxError> {
        read_slash_comment(reader, states, "C++ comment state", true)
    }
}
