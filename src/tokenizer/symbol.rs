use std::collections::HashMap;

use crate::error::SyntaxError;
use crate::reader::PushbackReader;

use super::{Token, TokenKind, TokenizerState, TokenizerStates, incorrect_usage};

#[derive(Debug, Default)]
struct SymbolNode {
    children: HashMap<char, SymbolNode>,
    /// Set when the path to this node spells a registered symbol.
    kind: Option<TokenKind>,
}

/// Prefix tree over multi-character symbols.
///
/// Matching descends as far as the input allows, remembers the deepest node
/// that completes a registered symbol, and pushes back whatever was read
/// past it. A lead character with no registered symbol is returned on its
/// own as a `Symbol`.
#[derive(Debug, Default)]
pub struct SymbolRootNode {
    root: SymbolNode,
}

impl SymbolRootNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: &str, kind: TokenKind) {
        if value.is_empty() {
            return;
        }
        let node = value.chars().fold(&mut self.root, |node, ch| {
            node.children.entry(ch).or_default()
        });
        node.kind = Some(kind);
    }

    /// Reads the longest registered symbol at the head of `reader`.
    pub fn next_token(&self, reader: &mut PushbackReader) -> Option<Token> {
        let first = reader.read()?;
        let mut consumed = vec![first];
        let mut node = self.root.children.get(&first);
        let mut best = (1, node.and_then(|node| node.kind).unwrap_or(TokenKind::Symbol));

        while let Some(current) = node {
            let Some(ch) = reader.read() else {
                break;
            };
            match current.children.get(&ch) {
                Some(child) => {
                    consumed.push(ch);
                    if let Some(kind) = child.kind {
                        best = (consumed.len(), kind);
                    }
                    node = Some(child);
                }
                None => {
                    reader.pushback(ch);
                    break;
                }
            }
        }

        for ch in consumed[best.0..].iter().rev() {
            reader.pushback(*ch);
        }
        Some(Token::new(best.1, consumed[..best.0].iter().collect::<String>()))
    }
}

/// Emits operator symbols using a [`SymbolRootNode`].
#[derive(Debug, Default)]
pub struct SymbolState {
    root: SymbolRootNode,
}

impl SymbolState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbol state with the two-character operators of the generic tokenizer.
    pub fn generic() -> Self {
        let mut state = SymbolState::new();
        for symbol in ["<>", "<=", ">=", "!=", "==", "&&", "||", ":="] {
            state.add(symbol, TokenKind::Symbol);
        }
        state
    }

    pub fn add(&mut self, value: &str, kind: TokenKind) {
        self.root.add(value, kind);
    }
}

impl TokenizerState for SymbolState {
    fn next_token(
        &self,
        reader: &mut PushbackReader,
        _states: &TokenizerStates,
    ) -> Result<Token, SyntaxError> {
        match self.root.next_token(reader) {
            Some(token) => Ok(token),
            None => Err(incorrect_usage("symbol state", reader)),
        }
    }
}

#[test]
fn test_symbol_longest_match() {
    let mut node = SymbolRootNode::new();
    node.add("<", TokenKind::Symbol);
    node.add("<<", TokenKind::Symbol);
    node.add("<>", TokenKind::Symbol);

    let mut reader = PushbackReader::new("<A<<<>");
    let values: Vec<String> = std::iter::from_fn(|| node.next_token(&mut reader))
        .map(|token| token.value)
        .collect();
    assert_eq!(values, vec!["<", "A", "<<", "<>"]);
}

#[test]
fn test_symbol_backtracks_to_last_valid_prefix() {
    let mut node = SymbolRootNode::new();
    node.add("<", TokenKind::Symbol);
    node.add("<<<=", TokenKind::Symbol);

    let mut reader = PushbackReader::new("<<<x");
    assert_eq!(node.next_token(&mut reader).map(|t| t.value), Some("<".to_string()));
    assert_eq!(reader.read(), Some('<'));
}
