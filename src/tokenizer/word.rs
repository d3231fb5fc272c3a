use crate::error::SyntaxError;
use crate::reader::PushbackReader;

use super::{CharReferenceMap, Token, TokenKind, TokenizerState, TokenizerStates, incorrect_usage};

/// Consumes a word: letters, digits, `_` and characters from 0xC0 upward.
///
/// The dispatch table decides which characters may *start* a word; this
/// state only decides where it ends.
pub struct WordState {
    map: CharReferenceMap<bool>,
}

impl WordState {
    pub fn new() -> Self {
        let mut state = WordState {
            map: CharReferenceMap::new(),
        };
        state.set_word_chars('a' as u32, 'z' as u32, true);
        state.set_word_chars('A' as u32, 'Z' as u32, true);
        state.set_word_chars('0' as u32, '9' as u32, true);
        state.set_word_chars('_' as u32, '_' as u32, true);
        state.set_word_chars(0xC0, 0xFFFE, true);
        state
    }

    pub fn set_word_chars(&mut self, start: u32, end: u32, enabled: bool) {
        self.map.add_interval(start, end, enabled);
    }

    pub fn clear_word_chars(&mut self) {
        self.map.clear();
    }

    pub fn is_word_char(&self, ch: char) -> bool {
        self.map.lookup(ch).unwrap_or(false)
    }

    pub(crate) fn read_word(&self, reader: &mut PushbackReader) -> String {
        let mut value = String::new();
        while let Some(ch) = reader.read() {
            if !self.is_word_char(ch) {
                reader.pushback(ch);
                break;
            }
            value.push(ch);
        }
        value
    }
}

impl Default for WordState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState for WordState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        _states: &TokenizerStates,
    ) -> Result<Token, SyntaxError> {
        let value = self.read_word(reader);
        if value.is_empty() {
            return Err(incorrect_usage("word state", reader));
        }
        Ok(Token::new(TokenKind::Word, value))
    }
}
