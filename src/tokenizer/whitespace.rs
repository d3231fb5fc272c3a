use crate::error::SyntaxError;
use crate::reader::PushbackReader;

use super::{CharReferenceMap, Token, TokenKind, TokenizerState, TokenizerStates, incorrect_usage};

/// Consumes a maximal run of whitespace characters (codes 0..=32 by default).
pub struct WhitespaceState {
    map: CharReferenceMap<bool>,
}

impl WhitespaceState {
    pub fn new() -> Self {
        let mut state = WhitespaceState {
            map: CharReferenceMap::new(),
        };
        state.set_whitespace_chars(0, ' ' as u32, true);
        state
    }

    pub fn set_whitespace_chars(&mut self, start: u32, end: u32, enabled: bool) {
        self.map.add_interval(start, end, enabled);
    }

    pub fn clear_whitespace_chars(&mut self) {
        self.map.clear();
    }

    fn is_whitespace(&self, ch: char) -> bool {
        self.map.lookup(ch).unwrap_or(false)
    }
}

impl Default for WhitespaceState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for WhitespaceState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        _states: &TokenizerStates,
    ) -> Result<Token, SyntaxError> {
        let mut value = String::new();
        while let Some(ch) = reader.read() {
            if !self.is_whitespace(ch) {
                reader.pushback(ch);
                break;
            }
            value.push(ch);
        }

        if value.is_empty() {
            return Err(incorrect_usage("whitespace state", reader));
        }
        Ok(Token::new(TokenKind::Whitespace, value))
    }
}
