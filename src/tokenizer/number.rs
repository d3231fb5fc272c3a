use crate::error::{SyntaxError, SyntaxErrorCode};
use crate::reader::PushbackReader;

use super::{Token, TokenKind, TokenizerState, TokenizerStates};

/// Reads `-?digits(.digits)?`. A `-` or `.` without any digit is handed to
/// the symbol state.
pub struct GenericNumberState;

pub(crate) fn read_digits(reader: &mut PushbackReader, value: &mut String) -> usize {
    let mut count = 0;
    while let Some(ch) = reader.peek().filter(|ch| ch.is_ascii_digit()) {
        reader.read();
        value.push(ch);
        count += 1;
    }
    count
}

impl TokenizerState for GenericNumberState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        states: &TokenizerStates,
    ) -> Result<Token, SyntaxError> {
        let start = reader.position();
        let mut value = String::new();

        if reader.peek() == Some('-') {
            reader.read();
            value.push('-');
        }

        let integer_digits = read_digits(reader, &mut value);

        if reader.peek() == Some('.') {
            reader.read();
            let mut fraction = String::new();
            let fraction_digits = read_digits(reader, &mut fraction);

            if integer_digits == 0 && fraction_digits == 0 {
                reader.pushback('.');
                reader.pushback_str(&value);
                return states.symbol.next_token(reader, states);
            }

            value.push('.');
            value.push_str(&fraction);
            return Ok(Token::new(TokenKind::Float, value));
        }

        if integer_digits == 0 {
            if value.is_empty() {
                return Err(SyntaxError::new(
                    SyntaxErrorCode::InvalidNumber,
                    "Number state invoked on a non-numeric character",
                    start,
                ));
            }
            reader.pushback_str(&value);
            return states.symbol.next_token(reader, states);
        }

        Ok(Token::new(TokenKind::Integer, value))
    }
}
