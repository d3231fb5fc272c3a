use crate::error::{SyntaxError, SyntaxErrorCode};
use crate::reader::PushbackReader;

use super::{Token, TokenKind, TokenizerState, TokenizerStates, incorrect_usage};

/// Reads a string delimited by the character that selected this state.
/// A doubled delimiter inside the string stands for one literal delimiter.
pub struct GenericQuoteState;

impl GenericQuoteState {
    /// Reads the raw quoted text, delimiters and doubled quotes included.
    pub(crate) fn read_quoted(reader: &mut PushbackReader) -> Result<String, SyntaxError> {
        let start = reader.position();
        let Some(quote) = reader.read() else {
            return Err(incorrect_usage("quote state", reader));
        };

        let mut value = String::from(quote);
        loop {
            match reader.read() {
                None => {
                    return Err(SyntaxError::new(
                        SyntaxErrorCode::UnterminatedString,
                        format!("Unterminated string: missing closing {quote}"),
                        start,
                    ));
                }
                Some(ch) if ch == quote => {
                    value.push(ch);
                    if reader.peek() != Some(quote) {
                        return Ok(value);
                    }
                    reader.read();
                    value.push(quote);
                }
                Some(ch) => value.push(ch),
            }
        }
    }
}

impl TokenizerState for GenericQuoteState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        _states: &TokenizerStates,
    ) -> Result<Token, SyntaxError> {
        let value = Self::read_quoted(reader)?;
        Ok(Token::new(TokenKind::Quoted, value))
    }
}

/// Wraps `value` in `quote`, doubling any embedded quote characters.
pub fn encode_string(value: &str, quote: char) -> String {
    let doubled: String = [quote, quote].iter().collect();
    format!("{quote}{}{quote}", value.replace(quote, &doubled))
}

/// Strips the delimiters from `value` and collapses doubled quotes.
/// Text that is not wrapped in `quote` is returned unchanged.
pub fn decode_string(value: &str, quote: char) -> String {
    let inner = value
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote));

    match inner {
        Some(inner) if value.chars().count() >= 2 => {
            let doubled: String = [quote, quote].iter().collect();
            inner.replace(&doubled, &quote.to_string())
        }
        _ => value.to_string(),
    }
}

#[test]
fn test_encode_decode_string() {
    assert_eq!(encode_string("ABC'DEF", '\''), "'ABC''DEF'");
    assert_eq!(decode_string("'ABC''DEF'", '\''), "ABC'DEF");
    assert_eq!(decode_string("ABC", '\''), "ABC");
    assert_eq!(decode_string("'", '\''), "'");
}
