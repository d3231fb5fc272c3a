// tests/parser_tests.rs

use exprcalc::tokenizer::{Token, TokenKind};
use exprcalc::{ExpressionParser, ExpressionTokenType, SyntaxErrorCode, Variant};

fn postfix(expression: &str) -> Vec<String> {
    let parser = ExpressionParser::parse(expression).unwrap();
    parser.result_tokens().iter().map(ToString::to_string).collect()
}

fn parse_error(expression: &str) -> SyntaxErrorCode {
    ExpressionParser::parse(expression).unwrap_err().code
}

// ============================================================================
// Postfix Order
// ============================================================================

#[test]
fn test_reference_expression() {
    assert_eq!(
        postfix("A + b / (3 - Max(-123, 1)*2)"),
        vec![
            "Variable A",
            "Variable b",
            "Constant 3 (Integer)",
            "Constant 123 (Integer)",
            "Unary",
            "Constant 1 (Integer)",
            "Function Max/2",
            "Constant 2 (Integer)",
            "Star",
            "Minus",
            "Slash",
            "Plus",
        ]
    );
}

#[test]
fn test_precedence() {
    assert_eq!(
        postfix("1 + 2 * 3"),
        vec![
            "Constant 1 (Integer)",
            "Constant 2 (Integer)",
            "Constant 3 (Integer)",
            "Star",
            "Plus",
        ]
    );
    assert_eq!(
        postfix("(1 + 2) * 3"),
        vec![
            "Constant 1 (Integer)",
            "Constant 2 (Integer)",
            "Plus",
            "Constant 3 (Integer)",
            "Star",
        ]
    );
}

#[test]
fn test_left_associative_minus() {
    assert_eq!(
        postfix("5 - 2 - 1"),
        vec![
            "Constant 5 (Integer)",
            "Constant 2 (Integer)",
            "Minus",
            "Constant 1 (Integer)",
            "Minus",
        ]
    );
}

#[test]
fn test_right_associative_power() {
    assert_eq!(
        postfix("2 ^ 3 ^ 2"),
        vec![
            "Constant 2 (Integer)",
            "Constant 3 (Integer)",
            "Constant 2 (Integer)",
            "Power",
            "Power",
        ]
    );
}

#[test]
fn test_logical_precedence() {
    assert_eq!(
        postfix("a OR b AND NOT c"),
        vec!["Variable a", "Variable b", "Variable c", "Not", "And", "Or"]
    );
    assert_eq!(
        postfix("a > 1 AND b < 2"),
        vec![
            "Variable a",
            "Constant 1 (Integer)",
            "More",
            "Variable b",
            "Constant 2 (Integer)",
            "Less",
            "And",
        ]
    );
}

#[test]
fn test_unary_plus_is_dropped() {
    assert_eq!(postfix("+5"), vec!["Constant 5 (Integer)"]);
    assert_eq!(postfix("+(+5)"), vec!["Constant 5 (Integer)"]);
    assert_eq!(
        postfix("2 * -x"),
        vec!["Constant 2 (Integer)", "Variable x", "Unary", "Star"]
    );
}

#[test]
fn test_zero_argument_call() {
    assert_eq!(postfix("Pi()"), vec!["Function Pi/0"]);
    assert_eq!(postfix("Null()"), vec!["Function Null/0"]);
}

#[test]
fn test_nested_calls_count_arguments() {
    assert_eq!(
        postfix("Max(1, Min(2, 3, 4))"),
        vec![
            "Constant 1 (Integer)",
            "Constant 2 (Integer)",
            "Constant 3 (Integer)",
            "Constant 4 (Integer)",
            "Function Min/3",
            "Function Max/2",
        ]
    );
}

#[test]
fn test_element_access() {
    assert_eq!(
        postfix("a[1 + 1]"),
        vec![
            "Variable a",
            "Constant 1 (Integer)",
            "Constant 1 (Integer)",
            "Plus",
            "Element",
        ]
    );
}

// ============================================================================
// Keywords
// ============================================================================

#[test]
fn test_compound_keywords() {
    assert_eq!(
        postfix("a NOT IN Array(1, 2)"),
        vec![
            "Variable a",
            "Constant 1 (Integer)",
            "Constant 2 (Integer)",
            "Function Array/2",
            "NotIn",
        ]
    );
    assert_eq!(
        postfix("name not like 'J%'"),
        vec!["Variable name", "Constant \"J%\"", "NotLike"]
    );
    assert_eq!(postfix("a IS NULL"), vec!["Variable a", "IsNull"]);
    assert_eq!(postfix("a is not null"), vec!["Variable a", "IsNotNull"]);
}

#[test]
fn test_is_null_binds_looser_than_arithmetic() {
    assert_eq!(
        postfix("a + 1 IS NULL OR b"),
        vec![
            "Variable a",
            "Constant 1 (Integer)",
            "Plus",
            "IsNull",
            "Variable b",
            "Or",
        ]
    );
}

#[test]
fn test_literal_keywords() {
    let parser = ExpressionParser::parse("TRUE XOR false = NULL").unwrap();
    let constants: Vec<&Variant> = parser
        .initial_tokens()
        .iter()
        .filter(|token| token.kind == ExpressionTokenType::Constant)
        .map(|token| &token.value)
        .collect();
    assert_eq!(
        constants,
        vec![&Variant::Boolean(true), &Variant::Boolean(false), &Variant::Null]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numeric_literal_kinds() {
    let parser = ExpressionParser::parse("1 + 3000000000 + 1.5 + 1e300").unwrap();
    let values: Vec<&Variant> = parser
        .initial_tokens()
        .iter()
        .filter(|token| token.kind == ExpressionTokenType::Constant)
        .map(|token| &token.value)
        .collect();
    assert_eq!(
        values,
        vec![
            &Variant::Integer(1),
            &Variant::Long(3_000_000_000),
            &Variant::Float(1.5),
            &Variant::Double(1e300),
        ]
    );
}

#[test]
fn test_quoted_identifier_is_variable() {
    let parser = ExpressionParser::parse("\"Unit Price\" * 2").unwrap();
    assert_eq!(parser.variable_names(), &["Unit Price".to_string()]);
}

// ============================================================================
// Variable Names and Streams
// ============================================================================

#[test]
fn test_variable_names_deduplicated() {
    let parser = ExpressionParser::parse("a + A + b + Max(a, c)").unwrap();
    assert_eq!(parser.variable_names(), &["a", "b", "c"]);
}

#[test]
fn test_empty_expression() {
    let parser = ExpressionParser::parse("   ").unwrap();
    assert!(parser.original_tokens().is_empty());
    assert!(parser.result_tokens().is_empty());
    assert!(parser.variable_names().is_empty());
}

#[test]
fn test_failed_parse_clears_streams() {
    let mut parser = ExpressionParser::parse("a + b").unwrap();
    assert!(parser.set_expression("a +").is_err());
    assert_eq!(parser.expression(), "a +");
    assert!(parser.original_tokens().is_empty());
    assert!(parser.initial_tokens().is_empty());
    assert!(parser.result_tokens().is_empty());
}

#[test]
fn test_set_original_tokens_rebuilds_expression() {
    let mut parser = ExpressionParser::new();
    parser
        .set_original_tokens(vec![
            Token::new(TokenKind::Word, "a"),
            Token::new(TokenKind::Symbol, "+"),
            Token::new(TokenKind::Quoted, "x'y"),
        ])
        .unwrap();

    assert_eq!(parser.expression(), "a+'x''y'");
    assert_eq!(parser.variable_names(), &["a"]);
    assert_eq!(parser.result_tokens().len(), 3);
}

// ============================================================================
// Syntax Errors
// ============================================================================

#[test]
fn test_syntax_errors() {
    let cases = vec![
        ("(1 + 2", SyntaxErrorCode::MissedCloseParenthesis),
        ("1 + 2)", SyntaxErrorCode::UnexpectedCloseParenthesis),
        ("a[1", SyntaxErrorCode::MissedCloseSquareBracket),
        ("a]", SyntaxErrorCode::UnexpectedCloseSquareBracket),
        ("1, 2", SyntaxErrorCode::CommaOutsideCall),
        ("1 * * 2", SyntaxErrorCode::MissingOperand),
        ("Max(1,)", SyntaxErrorCode::MissingOperand),
        ("1 2", SyntaxErrorCode::MissingOperator),
        ("a b", SyntaxErrorCode::MissingOperator),
        ("1 +", SyntaxErrorCode::UnexpectedEnd),
        ("+", SyntaxErrorCode::UnexpectedEnd),
        ("+ +", SyntaxErrorCode::UnexpectedEnd),
        ("2 * +", SyntaxErrorCode::UnexpectedEnd),
        ("(+)", SyntaxErrorCode::MissingOperand),
        ("Max(+, 1)", SyntaxErrorCode::MissingOperand),
        ("+ * 2", SyntaxErrorCode::MissingOperand),
        ("a IS 5", SyntaxErrorCode::UnknownSymbol),
        ("a IS", SyntaxErrorCode::UnexpectedEnd),
        ("a & b", SyntaxErrorCode::UnknownSymbol),
        ("'open", SyntaxErrorCode::UnterminatedString),
    ];

    for (expression, expected) in cases {
        assert_eq!(parse_error(expression), expected, "Failed for input: {}", expression);
    }
}

#[test]
fn test_error_position() {
    let err = ExpressionParser::parse("1 +\n  * 2").unwrap_err();
    assert_eq!(err.code, SyntaxErrorCode::MissingOperand);
    assert_eq!((err.line, err.column), (2, 3));
    assert!(err.to_string().ends_with("at line 2, column 3"));

    let err = ExpressionParser::parse("1 *\n +").unwrap_err();
    assert_eq!(err.code, SyntaxErrorCode::UnexpectedEnd);
    assert_eq!((err.line, err.column), (2, 2));
}
