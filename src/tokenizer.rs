//! # Tokenizer framework
//!
//! A tokenizer reads characters through a [`PushbackReader`] and, for every
//! token, looks up the *first* unread character in a dispatch table to pick
//! the state that consumes the rest of the token:
//!
//! - **[whitespace]** - runs of characters flagged as whitespace
//! - **[word]** - identifiers made of word characters
//! - **[number]** - integers and floats with an optional leading minus
//! - **[quote]** - quoted strings with doubled-quote escapes
//! - **[comment]** - `#`, `/* */` and `//` comments
//! - **[symbol]** - operators, matched greedily against a symbol trie
//!
//! Characters with no state produce a one-character `Unknown` token.
//! States may hand the reader over to another state (a bare `-` seen by the
//! number state becomes a symbol), which is why every state receives the
//! full [`TokenizerStates`] table.
//!
//! ```text
//! A+B/123 - 'xyz' <>-10.11 # comment
//! Word Symbol Word Symbol Integer ... Quoted ... Symbol Float ... Comment Eof
//! ```
pub mod char_map;
pub mod comment;
pub mod number;
pub mod quote;
pub mod symbol;
pub mod token;
pub mod whitespace;
pub mod word;

pub use char_map::CharReferenceMap;
pub use comment::{CCommentState, CppCommentState, GenericCommentState};
pub use number::GenericNumberState;
pub use quote::{GenericQuoteState, decode_string, encode_string};
pub use symbol::{SymbolRootNode, SymbolState};
pub use token::{Token, TokenKind};
pub use whitespace::WhitespaceState;
pub use word::WordState;

use crate::error::{SyntaxError, SyntaxErrorCode};
use crate::reader::PushbackReader;

/// A consumption rule for one class of tokens.
///
/// The reader is positioned on the token's first character when the state is
/// invoked.
pub trait TokenizerState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        states: &TokenizerStates,
    ) -> Result<Token, SyntaxError>;
}

/// Which state handles a given leading character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Whitespace,
    Word,
    Number,
    Quote,
    Comment,
    Symbol,
}

/// The dispatch table plus the state objects it points to.
pub struct TokenizerStates {
    map: CharReferenceMap<StateKind>,
    pub whitespace: Box<dyn TokenizerState>,
    pub word: Box<dyn TokenizerState>,
    pub number: Box<dyn TokenizerState>,
    pub quote: Box<dyn TokenizerState>,
    pub comment: Box<dyn TokenizerState>,
    pub symbol: Box<dyn TokenizerState>,
}

impl TokenizerStates {
    /// Generic states with an empty dispatch table.
    pub fn new() -> Self {
        TokenizerStates {
            map: CharReferenceMap::new(),
            whitespace: Box::new(WhitespaceState::new()),
            word: Box::new(WordState::new()),
            number: Box::new(GenericNumberState),
            quote: Box::new(GenericQuoteState),
            comment: Box::new(GenericCommentState),
            symbol: Box::new(SymbolState::generic()),
        }
    }

    /// Generic states with the generic dispatch table.
    pub fn generic() -> Self {
        let mut states = TokenizerStates::new();
        states.set_char_state(0x00, 0xFF, StateKind::Symbol);
        states.set_char_state(0x00, ' ' as u32, StateKind::Whitespace);
        states.set_char_state('a' as u32, 'z' as u32, StateKind::Word);
        states.set_char_state('A' as u32, 'Z' as u32, StateKind::Word);
        states.set_char_state('_' as u32, '_' as u32, StateKind::Word);
        states.set_char_state(0xC0, 0xFFFE, StateKind::Word);
        states.set_char_state('-' as u32, '-' as u32, StateKind::Number);
        states.set_char_state('.' as u32, '.' as u32, StateKind::Number);
        states.set_char_state('0' as u32, '9' as u32, StateKind::Number);
        states.set_char_state('"' as u32, '"' as u32, StateKind::Quote);
        states.set_char_state('\'' as u32, '\'' as u32, StateKind::Quote);
        states.set_char_state('#' as u32, '#' as u32, StateKind::Comment);
        states
    }

    /// Routes characters `start..=end` to `kind`, overriding earlier routes.
    pub fn set_char_state(&mut self, start: u32, end: u32, kind: StateKind) {
        self.map.add_interval(start, end, kind);
    }

    pub fn clear_char_states(&mut self) {
        self.map.clear();
    }

    pub fn state_kind(&self, ch: char) -> Option<StateKind> {
        self.map.lookup(ch)
    }

    pub fn state(&self, kind: StateKind) -> &dyn TokenizerState {
        match kind {
            StateKind::Whitespace => self.whitespace.as_ref(),
            StateKind::Word => self.word.as_ref(),
            StateKind::Number => self.number.as_ref(),
            StateKind::Quote => self.quote.as_ref(),
            StateKind::Comment => self.comment.as_ref(),
            StateKind::Symbol => self.symbol.as_ref(),
        }
    }
}

impl Default for TokenizerStates {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns text into a sequence of raw [`Token`]s with one token of lookahead.
pub struct Tokenizer {
    pub skip_unknown: bool,
    pub skip_whitespaces: bool,
    pub skip_comments: bool,
    pub skip_eof: bool,
    pub merge_whitespaces: bool,
    pub unify_numbers: bool,
    pub decode_strings: bool,
    states: TokenizerStates,
    reader: PushbackReader,
    lookahead: Option<Token>,
    last_kind: Option<TokenKind>,
    finished: bool,
}

impl Tokenizer {
    pub fn new(states: TokenizerStates) -> Self {
        Tokenizer {
            skip_unknown: false,
            skip_whitespaces: false,
            skip_comments: false,
            skip_eof: false,
            merge_whitespaces: false,
            unify_numbers: false,
            decode_strings: false,
            states,
            reader: PushbackReader::new(""),
            lookahead: None,
            last_kind: None,
            finished: false,
        }
    }

    /// Tokenizer for general-purpose text with the generic symbol set.
    pub fn generic() -> Self {
        Tokenizer::new(TokenizerStates::generic())
    }

    pub fn states(&self) -> &TokenizerStates {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut TokenizerStates {
        &mut self.states
    }

    /// Starts tokenizing `text` from the beginning, dropping any pending state.
    pub fn set_input(&mut self, text: &str) {
        self.reader = PushbackReader::new(text);
        self.lookahead = None;
        self.last_kind = None;
        self.finished = false;
    }

    pub fn has_next_token(&mut self) -> Result<bool, SyntaxError> {
        if self.lookahead.is_none() {
            self.lookahead = self.read_next_token()?;
        }
        Ok(self.lookahead.is_some())
    }

    pub fn next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        match self.lookahead.take() {
            Some(token) => Ok(Some(token)),
            None => self.read_next_token(),
        }
    }

    /// Tokenizes the whole of `text` eagerly.
    pub fn tokenize_buffer(&mut self, text: &str) -> Result<Vec<Token>, SyntaxError> {
        self.set_input(text);
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn read_next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        loop {
            if self.finished {
                return Ok(None);
            }

            let position = self.reader.position();
            let token = match self.reader.peek() {
                None => {
                    self.finished = true;
                    Token::new(TokenKind::Eof, "")
                }
                Some(ch) => match self.states.state_kind(ch) {
                    Some(kind) => self
                        .states
                        .state(kind)
                        .next_token(&mut self.reader, &self.states)?,
                    None => {
                        self.reader.read();
                        Token::new(TokenKind::Unknown, ch)
                    }
                },
            };
            let mut token = token.with_position(position);
            let kind = token.kind;

            match kind {
                TokenKind::Unknown if self.skip_unknown => continue,
                TokenKind::Whitespace if self.skip_whitespaces => continue,
                TokenKind::Whitespace
                    if self.merge_whitespaces && self.last_kind == Some(TokenKind::Whitespace) =>
                {
                    continue;
                }
                TokenKind::Comment if self.skip_comments => continue,
                TokenKind::Eof if self.skip_eof => return Ok(None),
                TokenKind::Integer | TokenKind::Float if self.unify_numbers => {
                    token.kind = TokenKind::Number;
                }
                TokenKind::Quoted if self.decode_strings => {
                    if let Some(quote) = token.value.chars().next() {
                        token.value = decode_string(&token.value, quote);
                    }
                }
                _ => {}
            }

            self.last_kind = Some(token.kind);
            return Ok(Some(token));
        }
    }
}

pub(crate) fn incorrect_usage(state: &str, reader: &PushbackReader) -> SyntaxError {
    SyntaxError::new(
        SyntaxErrorCode::Internal,
        format!("Incorrect usage of {state}"),
        reader.position(),
    )
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::generic()
    }
}
