use crate::reader::Position;

/// Kind of a raw lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Unknown,
    Eof,
    Symbol,
    /// Integer or float, emitted only when the tokenizer unifies numbers.
    Number,
    Integer,
    Float,
    /// Quoted string, delimiters included unless strings are decoded.
    Quoted,
    Word,
    Keyword,
    Whitespace,
    Comment,
    Special,
}

/// A raw token produced by the tokenizer.
///
/// Equality compares the kind and the text only, so tokens built by hand in
/// tests compare equal to tokens carrying source positions.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Token {
            kind,
            value: value.into(),
            line: 0,
            column: 0,
        }
    }

    pub fn at(kind: TokenKind, value: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            value: value.into(),
            line: position.line,
            column: position.column,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub(crate) fn with_position(mut self, position: Position) -> Self {
        self.line = position.line;
        self.column = position.column;
        self
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

impl Eq for Token {}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {:?} ({}:{})", self.kind, self.value, self.line, self.column)
    }
}
