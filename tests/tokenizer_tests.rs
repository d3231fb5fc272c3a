// tests/tokenizer_tests.rs

use exprcalc::tokenizer::{
    CCommentState, CppCommentState, StateKind, Token, TokenKind, Tokenizer, TokenizerState,
    TokenizerStates,
};
use exprcalc::{PushbackReader, SyntaxErrorCode};

fn tokens(tokenizer: &mut Tokenizer, text: &str) -> Vec<Token> {
    tokenizer.tokenize_buffer(text).unwrap()
}

fn token(kind: TokenKind, value: &str) -> Token {
    Token::new(kind, value)
}

// ============================================================================
// Pushback Reader
// ============================================================================

#[test]
fn test_reader_pushback_replays_in_order() {
    let mut reader = PushbackReader::new("abc");
    assert_eq!(reader.read(), Some('a'));
    assert_eq!(reader.read(), Some('b'));
    reader.pushback_str("ab");
    assert_eq!(reader.read(), Some('a'));
    assert_eq!(reader.read(), Some('b'));
    assert_eq!(reader.read(), Some('c'));
    assert_eq!(reader.read(), None);

    reader.pushback(None);
    assert_eq!(reader.read(), None);
}

#[test]
fn test_reader_tracks_lines_and_columns() {
    let mut reader = PushbackReader::new("a\nbc");
    assert_eq!(reader.position().line, 1);
    assert_eq!(reader.position().column, 1);

    reader.read();
    reader.read();
    assert_eq!(reader.position().line, 2);
    assert_eq!(reader.position().column, 1);

    let ch = reader.read();
    assert_eq!(reader.position().column, 2);
    reader.pushback(ch);
    assert_eq!(reader.position().column, 1);
}

// ============================================================================
// Generic Tokenizer
// ============================================================================

#[test]
fn test_generic_mixed_input() {
    let mut tokenizer = Tokenizer::generic();
    let result = tokens(
        &mut tokenizer,
        "A+B/123 - \t 'xyz'\n <>-10.11# This is a comment",
    );

    let expected = vec![
        token(TokenKind::Word, "A"),
        token(TokenKind::Symbol, "+"),
        token(TokenKind::Word, "B"),
        token(TokenKind::Symbol, "/"),
        token(TokenKind::Integer, "123"),
        token(TokenKind::Whitespace, " "),
        token(TokenKind::Symbol, "-"),
        token(TokenKind::Whitespace, " \t "),
        token(TokenKind::Quoted, "'xyz'"),
        token(TokenKind::Whitespace, "\n "),
        token(TokenKind::Symbol, "<>"),
        token(TokenKind::Float, "-10.11"),
        token(TokenKind::Comment, "# This is a comment"),
        token(TokenKind::Eof, ""),
    ];
    assert_eq!(result.len(), 14);
    assert_eq!(result, expected);
}

#[test]
fn test_generic_words_and_decoded_quotes() {
    let mut tokenizer = Tokenizer::generic();
    tokenizer.skip_eof = true;
    tokenizer.decode_strings = true;

    let result = tokens(&mut tokenizer, "A'xyz'Ebf_2\n2x_2");
    assert_eq!(
        result,
        vec![
            token(TokenKind::Word, "A"),
            token(TokenKind::Quoted, "xyz"),
            token(TokenKind::Word, "Ebf_2"),
            token(TokenKind::Whitespace, "\n"),
            token(TokenKind::Integer, "2"),
            token(TokenKind::Word, "x_2"),
        ]
    );
}

#[test]
fn test_generic_numbers() {
    let mut tokenizer = Tokenizer::generic();
    let result = tokens(&mut tokenizer, "123-321 .543-.76-. -123.456");

    assert_eq!(
        result,
        vec![
            token(TokenKind::Integer, "123"),
            token(TokenKind::Integer, "-321"),
            token(TokenKind::Whitespace, " "),
            token(TokenKind::Float, ".543"),
            token(TokenKind::Float, "-.76"),
            token(TokenKind::Symbol, "-"),
            token(TokenKind::Symbol, "."),
            token(TokenKind::Whitespace, " "),
            token(TokenKind::Float, "-123.456"),
            token(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_generic_trailing_dot_is_float() {
    let mut tokenizer = Tokenizer::generic();
    tokenizer.skip_eof = true;
    assert_eq!(
        tokens(&mut tokenizer, "123."),
        vec![token(TokenKind::Float, "123.")]
    );
}

#[test]
fn test_generic_expression_text() {
    let mut tokenizer = Tokenizer::generic();
    let result = tokens(&mut tokenizer, "A + b / (3 - Max(-123, 1)*2)");

    assert_eq!(result.len(), 24);
    assert_eq!(result[11], token(TokenKind::Symbol, "-"));
    assert_eq!(result[13], token(TokenKind::Word, "Max"));
    assert_eq!(result[15], token(TokenKind::Integer, "-123"));
    assert_eq!(result[23], token(TokenKind::Eof, ""));
}

#[test]
fn test_generic_single_char_comparison() {
    let mut tokenizer = Tokenizer::generic();
    assert_eq!(
        tokens(&mut tokenizer, "1>2"),
        vec![
            token(TokenKind::Integer, "1"),
            token(TokenKind::Symbol, ">"),
            token(TokenKind::Integer, "2"),
            token(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_token_positions() {
    let mut tokenizer = Tokenizer::generic();
    tokenizer.skip_whitespaces = true;
    tokenizer.skip_eof = true;

    let result = tokens(&mut tokenizer, "a\n  bc");
    assert_eq!((result[0].line, result[0].column), (1, 1));
    assert_eq!((result[1].line, result[1].column), (2, 3));
}

// ============================================================================
// Flags
// ============================================================================

#[test]
fn test_skip_flags() {
    let mut tokenizer = Tokenizer::generic();
    tokenizer.skip_whitespaces = true;
    tokenizer.skip_comments = true;
    tokenizer.skip_eof = true;

    let result = tokens(&mut tokenizer, "a + b # trailing");
    assert_eq!(
        result,
        vec![
            token(TokenKind::Word, "a"),
            token(TokenKind::Symbol, "+"),
            token(TokenKind::Word, "b"),
        ]
    );
}

#[test]
fn test_unify_numbers() {
    let mut tokenizer = Tokenizer::generic();
    tokenizer.unify_numbers = true;
    tokenizer.skip_whitespaces = true;
    tokenizer.skip_eof = true;

    let result = tokens(&mut tokenizer, "1 2.5");
    assert!(result.iter().all(|token| token.kind == TokenKind::Number));
}

#[test]
fn test_unknown_characters() {
    let mut states = TokenizerStates::generic();
    states.clear_char_states();
    states.set_char_state('a' as u32, 'z' as u32, StateKind::Word);

    let mut tokenizer = Tokenizer::new(states);
    tokenizer.skip_eof = true;
    assert_eq!(
        tokens(&mut tokenizer, "ab$"),
        vec![token(TokenKind::Word, "ab"), token(TokenKind::Unknown, "$")]
    );

    tokenizer.skip_unknown = true;
    assert_eq!(tokens(&mut tokenizer, "ab$"), vec![token(TokenKind::Word, "ab")]);
}

#[test]
fn test_lookahead_and_reuse() {
    let mut tokenizer = Tokenizer::generic();
    tokenizer.skip_eof = true;
    tokenizer.set_input("x");

    assert!(tokenizer.has_next_token().unwrap());
    assert!(tokenizer.has_next_token().unwrap());
    assert_eq!(tokenizer.next_token().unwrap(), Some(token(TokenKind::Word, "x")));
    assert!(!tokenizer.has_next_token().unwrap());
    assert_eq!(tokenizer.next_token().unwrap(), None);

    assert_eq!(tokens(&mut tokenizer, "y"), vec![token(TokenKind::Word, "y")]);
}

#[test]
fn test_unterminated_string() {
    let mut tokenizer = Tokenizer::generic();
    let err = tokenizer.tokenize_buffer("a 'open").unwrap_err();
    assert_eq!(err.code, SyntaxErrorCode::UnterminatedString);
    assert_eq!((err.line, err.column), (1, 3));
}

// ============================================================================
// Comment States
// ============================================================================

#[test]
fn test_c_comments() {
    let mut states = TokenizerStates::generic();
    states.comment = Box::new(CCommentState);
    states.set_char_state('/' as u32, '/' as u32, StateKind::Comment);

    let mut tokenizer = Tokenizer::new(states);
    tokenizer.skip_eof = true;
    assert_eq!(
        tokens(&mut tokenizer, "a/* x */b/c"),
        vec![
            token(TokenKind::Word, "a"),
            token(TokenKind::Comment, "/* x */"),
            token(TokenKind::Word, "b"),
            token(TokenKind::Symbol, "/"),
            token(TokenKind::Word, "c"),
        ]
    );
}

#[test]
fn test_cpp_comments() {
    let mut states = TokenizerStates::generic();
    states.comment = Box::new(CppCommentState);
    states.set_char_state('/' as u32, '/' as u32, StateKind::Comment);

    let mut tokenizer = Tokenizer::new(states);
    tokenizer.skip_eof = true;
    assert_eq!(
        tokens(&mut tokenizer, "a// note\nb"),
        vec![
            token(TokenKind::Word, "a"),
            token(TokenKind::Comment, "// note"),
            token(TokenKind::Whitespace, "\n"),
            token(TokenKind::Word, "b"),
        ]
    );
}

#[test]
fn test_comment_state_rejects_other_lead() {
    let states = TokenizerStates::generic();
    let mut reader = PushbackReader::new("x");
    assert!(CCommentState.next_token(&mut reader, &states).is_err());
}
