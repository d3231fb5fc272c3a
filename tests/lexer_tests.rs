// tests/lexer_tests.rs

use exprcalc::lexer::is_keyword;
use exprcalc::tokenizer::{Token, TokenKind, Tokenizer};

fn lex(text: &str) -> Vec<Token> {
    Tokenizer::expression().tokenize_buffer(text).unwrap()
}

fn token(kind: TokenKind, value: &str) -> Token {
    Token::new(kind, value)
}

// ============================================================================
// Quoted Strings and Identifiers
// ============================================================================

#[test]
fn test_single_and_double_quotes() {
    let mut tokenizer = Tokenizer::expression();
    tokenizer.decode_strings = true;
    let result = tokenizer
        .tokenize_buffer("A'xyz'\"abc\ndeg\" 'jkl\"def'\"ab\"\"de\"'df''er'")
        .unwrap();

    assert_eq!(
        result,
        vec![
            token(TokenKind::Word, "A"),
            token(TokenKind::Quoted, "xyz"),
            token(TokenKind::Word, "abc\ndeg"),
            token(TokenKind::Whitespace, " "),
            token(TokenKind::Quoted, "jkl\"def"),
            token(TokenKind::Word, "ab\"de"),
            token(TokenKind::Quoted, "df'er"),
            token(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_quoted_strings_stay_encoded_by_default() {
    assert_eq!(
        lex("'it''s'"),
        vec![token(TokenKind::Quoted, "'it''s'"), token(TokenKind::Eof, "")]
    );
}

// ============================================================================
// Words and Keywords
// ============================================================================

#[test]
fn test_words() {
    assert_eq!(
        lex("A'xyz'Ebf_2\n2_2"),
        vec![
            token(TokenKind::Word, "A"),
            token(TokenKind::Quoted, "'xyz'"),
            token(TokenKind::Word, "Ebf_2"),
            token(TokenKind::Whitespace, "\n"),
            token(TokenKind::Integer, "2"),
            token(TokenKind::Word, "_2"),
            token(TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_keywords_keep_spelling() {
    let mut tokenizer = Tokenizer::expression();
    tokenizer.skip_whitespaces = true;
    tokenizer.skip_eof = true;
    let result = tokenizer.tokenize_buffer("a and Not b Is null").unwrap();

    assert_eq!(
        result,
        vec![
            token(TokenKind::Word, "a"),
            token(TokenKind::Keyword, "and"),
            token(TokenKind::Keyword, "Not"),
            token(TokenKind::Word, "b"),
            token(TokenKind::Keyword, "Is"),
            token(TokenKind::Keyword, "null"),
        ]
    );
}

#[test]
fn test_keyword_list() {
    for word in ["AND", "or", "Xor", "not", "IN", "is", "NULL", "like", "True", "false"] {
        assert!(is_keyword(word), "Expected keyword: {}", word);
    }
    for word in ["Max", "ANDROID", "nullable"] {
        assert!(!is_keyword(word), "Unexpected keyword: {}", word);
    }
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_numbers() {
    let result = lex("123-321 .543-.76-. 123.456 123e45 543.11E+43 1e 3E-");

    assert_eq!(
        result,
        vec![
            token(TokenKind::Integer, "123"),
            token(TokenKind::Symbol, "-"),
            token(TokenKind::Integer, "321"),
            token(TokenKind::Whitespace, " "),
            token(TokenKind::Float, ".543"),
            token(TokenKind::Symbol, "-"),
            token(TokenKind::Float, ".76"),
            token(TokenKind::Symbol, "-"),
            token(TokenKind::Symbol, "."),
            token(TokenKind::Whitespace, " "),
            token(TokenKind::Float, "123.456"),
            token(TokenKind::Whitespace, " "),
            token(TokenKind::Float, "123e45"),
            token(TokenKind::Whitespace, " "),
            token(TokenKind::Float, "543.11E+43"),
            token(TokenKind::Whitespace, " "),
            token(TokenKind::Integer, "1"),
            token(TokenKind::Word, "e"),
            token(TokenKind::Whitespace, " "),
            token(TokenKind::Integer, "3"),
            token(TokenKind::Word, "E"),
            token(TokenKind::Symbol, "-"),
            token(TokenKind::Eof, ""),
        ]
    );
}

// ============================================================================
// Symbols and Comments
// ============================================================================

#[test]
fn test_expression_text() {
    let result = lex("A + b / (3 - Max(-123, 1)*2)");

    assert_eq!(result.len(), 25);
    assert_eq!(result[15], token(TokenKind::Symbol, "-"));
    assert_eq!(result[16], token(TokenKind::Integer, "123"));
    assert_eq!(result[24], token(TokenKind::Eof, ""));
}

#[test]
fn test_two_char_symbols() {
    let mut tokenizer = Tokenizer::expression();
    tokenizer.skip_whitespaces = true;
    tokenizer.skip_eof = true;
    let result = tokenizer.tokenize_buffer("<= >= <> != >> << < >").unwrap();

    let values: Vec<&str> = result.iter().map(|token| token.value.as_str()).collect();
    assert_eq!(values, vec!["<=", ">=", "<>", "!=", ">>", "<<", "<", ">"]);
    assert!(result.iter().all(|token| token.kind == TokenKind::Symbol));
}

#[test]
fn test_comments() {
    let mut tokenizer = Tokenizer::expression();
    tokenizer.skip_whitespaces = true;
    tokenizer.skip_eof = true;
    let result = tokenizer
        .tokenize_buffer("1 /* inline */ / 2 // rest of line")
        .unwrap();

    assert_eq!(
        result,
        vec![
            token(TokenKind::Integer, "1"),
            token(TokenKind::Comment, "/* inline */"),
            token(TokenKind::Symbol, "/"),
            token(TokenKind::Integer, "2"),
            token(TokenKind::Comment, "// rest of line"),
        ]
    );
}
