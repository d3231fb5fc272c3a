//! Character source with unlimited pushback.
//!
//! Every tokenizer state reads through a [`PushbackReader`]. States that
//! over-consume (a number followed by `e` with no exponent digits, a `/` that
//! does not open a comment) push the surplus back so the next state sees it
//! again.

/// A 1-based line/column pair in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 1 }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Wraps a string and replays pushed-back characters before resuming the
/// underlying text.
pub struct PushbackReader {
    input: Vec<char>,
    index: usize,
    /// Next source position (ignores pending pushback).
    source_position: Position,
    /// Pending characters, top of the stack is read first.
    pending: Vec<(char, Position)>,
    /// Positions of characters handed out, used to restore positions on pushback.
    history: Vec<Position>,
}

impl PushbackReader {
    pub fn new(input: &str) -> Self {
        PushbackReader {
            input: input.chars().collect(),
            index: 0,
            source_position: Position::default(),
            pending: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Reads the next character, or `None` once the input is exhausted.
    pub fn read(&mut self) -> Option<char> {
        if let Some((ch, position)) = self.pending.pop() {
            self.history.push(position);
            return Some(ch);
        }

        let ch = self.input.get(self.index).copied()?;
        self.index += 1;
        self.history.push(self.source_position);

        if ch == '\n' {
            self.source_position.line += 1;
            self.source_position.column = 1;
        } else {
            self.source_position.column += 1;
        }

        Some(ch)
    }

    /// Returns the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        match self.pending.last() {
            Some((ch, _)) => Some(*ch),
            None => self.input.get(self.index).copied(),
        }
    }

    /// Puts a character back on top of the stream. Pushing back `None` (EOF)
    /// is a no-op.
    pub fn pushback(&mut self, ch: impl Into<Option<char>>) {
        let Some(ch) = ch.into() else {
            return;
        };
        let position = self.history.pop().unwrap_or_else(|| self.position());
        self.pending.push((ch, position));
    }

    /// Puts a whole string back so that its first character is read next.
    pub fn pushback_str(&mut self, value: &str) {
        for ch in value.chars().rev() {
            self.pushback(ch);
        }
    }

    /// Position of the character the next `read()` returns.
    pub fn position(&self) -> Position {
        match self.pending.last() {
            Some((_, position)) => *position,
            None => self.source_position,
        }
    }
}

#[test]
fn test_pushback_replays_before_source() {
    let mut reader = PushbackReader::new("ab");
    assert_eq!(reader.read(), Some('a'));
    reader.pushback_str("xy");
    assert_eq!(reader.read(), Some('x'));
    assert_eq!(reader.read(), Some('y'));
    assert_eq!(reader.read(), Some('b'));
    assert_eq!(reader.read(), None);
}

#[test]
fn test_position_restored_on_pushback() {
    let mut reader = PushbackReader::new("a\nbc");
    reader.read();
    reader.read();
    assert_eq!(reader.position(), Position::new(2, 1));
    let ch = reader.read();
    assert_eq!(reader.position(), Position::new(2, 2));
    reader.pushback(ch);
    assert_eq!(reader.position(), Position::new(2, 1));
}
