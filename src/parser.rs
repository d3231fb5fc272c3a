use tracing::{debug, trace};

use crate::ast::{Associativity, ExpressionToken, ExpressionTokenType, associativity, precedence};
use crate::error::{SyntaxError, SyntaxErrorCode};
use crate::reader::Position;
use crate::tokenizer::{Token, TokenKind, Tokenizer, encode_string};
use crate::value::Variant;

/// Converts expression text into a postfix token stream.
///
/// Parsing happens whenever the expression is assigned and keeps three
/// views of it for introspection: the raw lexical tokens, the typed tokens
/// in source order, and the typed tokens in postfix order.
#[derive(Debug, Clone, Default)]
pub struct ExpressionParser {
    expression: String,
    original_tokens: Vec<Token>,
    initial_tokens: Vec<ExpressionToken>,
    result_tokens: Vec<ExpressionToken>,
    variable_names: Vec<String>,
}

impl ExpressionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `expression` into a new parser.
    pub fn parse(expression: &str) -> Result<Self, SyntaxError> {
        let mut parser = ExpressionParser::new();
        parser.set_expression(expression)?;
        Ok(parser)
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Replaces the expression and parses it. On failure the token streams
    /// are left empty.
    pub fn set_expression(&mut self, expression: &str) -> Result<(), SyntaxError> {
        self.clear();
        self.expression = expression.to_string();

        let mut tokenizer = Tokenizer::expression();
        tokenizer.skip_whitespaces = true;
        tokenizer.skip_comments = true;
        tokenizer.skip_eof = true;
        tokenizer.decode_strings = true;

        let tokens = tokenizer.tokenize_buffer(expression)?;
        self.parse_tokens(tokens)
    }

    /// Parses an already tokenized expression. The expression text is
    /// rebuilt from the tokens.
    pub fn set_original_tokens(&mut self, tokens: Vec<Token>) -> Result<(), SyntaxError> {
        self.clear();
        self.expression = compose_expression(&tokens);
        self.parse_tokens(tokens)
    }

    pub fn original_tokens(&self) -> &[Token] {
        &self.original_tokens
    }

    pub fn initial_tokens(&self) -> &[ExpressionToken] {
        &self.initial_tokens
    }

    pub fn result_tokens(&self) -> &[ExpressionToken] {
        &self.result_tokens
    }

    /// Variable names in order of first appearance, one entry per name
    /// regardless of case.
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    pub fn clear(&mut self) {
        self.expression.clear();
        self.clear_tokens();
    }

    fn clear_tokens(&mut self) {
        self.original_tokens.clear();
        self.initial_tokens.clear();
        self.result_tokens.clear();
        self.variable_names.clear();
    }

    fn parse_tokens(&mut self, tokens: Vec<Token>) -> Result<(), SyntaxError> {
        let parsed = TypedTokenReader::new(&tokens)
            .read_all()
            .and_then(|initial| to_postfix(&initial).map(|result| (initial, result)));

        match parsed {
            Ok((initial, result)) => {
                self.variable_names = collect_variable_names(&initial);
                self.original_tokens = tokens;
                self.initial_tokens = initial;
                self.result_tokens = result;
                debug!(
                    expression = %self.expression,
                    tokens = self.result_tokens.len(),
                    variables = ?self.variable_names,
                    "parsed expression"
                );
                Ok(())
            }
            Err(err) => {
                debug!(expression = %self.expression, error = %err, "failed to parse expression");
                self.clear_tokens();
                Err(err)
            }
        }
    }
}

fn compose_expression(tokens: &[Token]) -> String {
    let mut expression = String::new();
    for token in tokens {
        match token.kind {
            TokenKind::Quoted => expression.push_str(&encode_string(&token.value, '\'')),
            _ => expression.push_str(&token.value),
        }
    }
    expression
}

fn collect_variable_names(tokens: &[ExpressionToken]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in tokens {
        if token.kind != ExpressionTokenType::Variable {
            continue;
        }
        let Some(name) = token.name() else {
            continue;
        };
        if !names.iter().any(|known| known.eq_ignore_ascii_case(name)) {
            names.push(name.to_string());
        }
    }
    names
}

fn syntax_error(code: SyntaxErrorCode, message: impl Into<String>, position: Position) -> SyntaxError {
    SyntaxError::new(code, message, position)
}

/// Turns raw tokens into typed tokens: maps symbols to operators, folds
/// multi-word keywords and parses literals.
struct TypedTokenReader<'a> {
    tokens: &'a [Token],
    position: usize,
    output: Vec<ExpressionToken>,
    /// A unary `+` that was dropped and still needs an operand.
    dropped_plus: Option<Position>,
}

impl<'a> TypedTokenReader<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        TypedTokenReader {
            tokens,
            position: 0,
            output: Vec::new(),
            dropped_plus: None,
        }
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    fn peek(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.position + offset)
    }

    fn peek_keyword(&self, offset: usize, keyword: &str) -> bool {
        self.peek(offset).is_some_and(|token| {
            token.kind == TokenKind::Keyword && token.value.eq_ignore_ascii_case(keyword)
        })
    }

    /// True when the next token would start an operand rather than follow one.
    fn expects_operand(&self) -> bool {
        use ExpressionTokenType::*;
        match self.output.last() {
            None => true,
            Some(token) => !matches!(
                token.kind,
                Constant | Variable | RightBrace | RightSquareBrace | IsNull | IsNotNull
            ),
        }
    }

    fn read_all(mut self) -> Result<Vec<ExpressionToken>, SyntaxError> {
        while let Some(token) = self.advance() {
            let position = token.position();
            let typed = match token.kind {
                TokenKind::Symbol => self.read_symbol(token)?,
                TokenKind::Keyword => self.read_keyword(token)?,
                TokenKind::Integer => Some(ExpressionToken::new(
                    ExpressionTokenType::Constant,
                    parse_integer(&token.value, position)?,
                    position,
                )),
                TokenKind::Float | TokenKind::Number => Some(ExpressionToken::new(
                    ExpressionTokenType::Constant,
                    parse_float(&token.value, position)?,
                    position,
                )),
                TokenKind::Quoted => Some(ExpressionToken::new(
                    ExpressionTokenType::Constant,
                    Variant::String(token.value.clone()),
                    position,
                )),
                TokenKind::Word => {
                    let is_call = self
                        .peek(0)
                        .is_some_and(|next| next.kind == TokenKind::Symbol && next.value == "(");
                    let kind = if is_call {
                        ExpressionTokenType::Function
                    } else {
                        ExpressionTokenType::Variable
                    };
                    Some(ExpressionToken::new(
                        kind,
                        Variant::String(token.value.clone()),
                        position,
                    ))
                }
                TokenKind::Whitespace | TokenKind::Comment | TokenKind::Eof => None,
                TokenKind::Unknown | TokenKind::Special => {
                    return Err(syntax_error(
                        SyntaxErrorCode::UnknownCharacter,
                        format!("Unknown character '{}'", token.value),
                        position,
                    ));
                }
            };

            if let Some(typed) = typed {
                self.check_dropped_plus(&typed)?;
                self.output.push(typed);
            }
        }

        if let Some(position) = self.dropped_plus {
            return Err(syntax_error(
                SyntaxErrorCode::UnexpectedEnd,
                "Expected an operand after '+'",
                position,
            ));
        }
        Ok(self.output)
    }

    fn check_dropped_plus(&mut self, next: &ExpressionToken) -> Result<(), SyntaxError> {
        use ExpressionTokenType::*;
        let Some(position) = self.dropped_plus.take() else {
            return Ok(());
        };
        if next.kind.is_binary_operator() || matches!(next.kind, RightBrace | RightSquareBrace | Comma) {
            return Err(missing_operand(position));
        }
        Ok(())
    }

    fn read_symbol(&mut self, token: &Token) -> Result<Option<ExpressionToken>, SyntaxError> {
        use ExpressionTokenType::*;
        let position = token.position();
        let kind = match token.value.as_str() {
            "(" => LeftBrace,
            ")" => RightBrace,
            "[" => LeftSquareBrace,
            "]" => RightSquareBrace,
            "," => Comma,
            "+" if self.expects_operand() => {
                self.dropped_plus = Some(position);
                return Ok(None);
            }
            "+" => Plus,
            "-" if self.expects_operand() => Unary,
            "-" => Minus,
            "*" => Star,
            "/" => Slash,
            "%" => Procent,
            "^" => Power,
            "=" => Equal,
            "<>" | "!=" => NotEqual,
            ">" => More,
            "<" => Less,
            ">=" => EqualMore,
            "<=" => EqualLess,
            "<<" => ShiftLeft,
            ">>" => ShiftRight,
            other => {
                return Err(syntax_error(
                    SyntaxErrorCode::UnknownSymbol,
                    format!("Unknown symbol '{other}'"),
                    position,
                ));
            }
        };
        Ok(Some(ExpressionToken::operator(kind, position)))
    }

    fn read_keyword(&mut self, token: &Token) -> Result<Option<ExpressionToken>, SyntaxError> {
        use ExpressionTokenType::*;
        let position = token.position();
        let keyword = token.value.to_ascii_uppercase();

        let typed = match keyword.as_str() {
            "AND" => ExpressionToken::operator(And, position),
            "OR" => ExpressionToken::operator(Or, position),
            "XOR" => ExpressionToken::operator(Xor, position),
            "IN" => ExpressionToken::operator(In, position),
            "LIKE" => ExpressionToken::operator(Like, position),
            "NOT" if self.peek_keyword(0, "IN") => {
                self.advance();
                ExpressionToken::operator(NotIn, position)
            }
            "NOT" if self.peek_keyword(0, "LIKE") => {
                self.advance();
                ExpressionToken::operator(NotLike, position)
            }
            "NOT" => ExpressionToken::operator(Not, position),
            "IS" if self.peek_keyword(0, "NULL") => {
                self.advance();
                ExpressionToken::operator(IsNull, position)
            }
            "IS" if self.peek_keyword(0, "NOT") && self.peek_keyword(1, "NULL") => {
                self.advance();
                self.advance();
                ExpressionToken::operator(IsNotNull, position)
            }
            "IS" => {
                let code = if self.peek(0).is_none() {
                    SyntaxErrorCode::UnexpectedEnd
                } else {
                    SyntaxErrorCode::UnknownSymbol
                };
                return Err(syntax_error(code, "Expected NULL or NOT NULL after IS", position));
            }
            "NULL"
                if self
                    .peek(0)
                    .is_some_and(|next| next.kind == TokenKind::Symbol && next.value == "(") =>
            {
                ExpressionToken::new(Function, Variant::String(token.value.clone()), position)
            }
            "NULL" => ExpressionToken::new(Constant, Variant::Null, position),
            "TRUE" => ExpressionToken::new(Constant, Variant::Boolean(true), position),
            "FALSE" => ExpressionToken::new(Constant, Variant::Boolean(false), position),
            _ => {
                return Err(syntax_error(
                    SyntaxErrorCode::UnknownSymbol,
                    format!("Unknown keyword '{}'", token.value),
                    position,
                ));
            }
        };
        Ok(Some(typed))
    }
}

/// Integer literal: Integer when it fits 32 bits, then Long, then Double.
fn parse_integer(text: &str, position: Position) -> Result<Variant, SyntaxError> {
    if let Ok(value) = text.parse::<i32>() {
        return Ok(Variant::Integer(value));
    }
    if let Ok(value) = text.parse::<i64>() {
        return Ok(Variant::Long(value));
    }
    parse_float(text, position)
}

/// Float literal: Float unless it only fits a Double.
fn parse_float(text: &str, position: Position) -> Result<Variant, SyntaxError> {
    let value = text.parse::<f64>().map_err(|_| {
        syntax_error(
            SyntaxErrorCode::InvalidNumber,
            format!("Invalid number '{text}'"),
            position,
        )
    })?;

    let narrow = value as f32;
    if narrow.is_finite() && (value == 0.0 || narrow != 0.0) {
        Ok(Variant::Float(narrow))
    } else {
        Ok(Variant::Double(value))
    }
}

enum StackEntry {
    Operator(ExpressionToken),
    /// An open `(`, owned by a function call when `function` is set.
    Group {
        open: Position,
        function: Option<ExpressionToken>,
        commas: usize,
    },
    /// An open `[`.
    Square(Position),
}

/// Rearranges typed tokens into postfix order with an operator stack.
fn to_postfix(tokens: &[ExpressionToken]) -> Result<Vec<ExpressionToken>, SyntaxError> {
    use ExpressionTokenType::*;

    let mut output: Vec<ExpressionToken> = Vec::new();
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut pending_function: Option<ExpressionToken> = None;
    let mut expect_operand = true;
    let mut previous: Option<ExpressionTokenType> = None;

    for token in tokens {
        let position = token.position();
        trace!(kind = ?token.kind, line = token.line, column = token.column, "postfix step");

        match token.kind {
            Constant | Variable => {
                if !expect_operand {
                    return Err(missing_operator(position));
                }
                output.push(token.clone());
                expect_operand = false;
            }
            Function => {
                if !expect_operand {
                    return Err(missing_operator(position));
                }
                pending_function = Some(token.clone());
            }
            LeftBrace => {
                if !expect_operand {
                    return Err(missing_operator(position));
                }
                stack.push(StackEntry::Group {
                    open: position,
                    function: pending_function.take(),
                    commas: 0,
                });
            }
            Comma => {
                if expect_operand {
                    return Err(missing_operand(position));
                }
                pop_operators(&mut stack, &mut output);
                match stack.last_mut() {
                    Some(StackEntry::Group {
                        function: Some(_),
                        commas,
                        ..
                    }) => *commas += 1,
                    _ => {
                        return Err(syntax_error(
                            SyntaxErrorCode::CommaOutsideCall,
                            "Comma is only allowed between function arguments",
                            position,
                        ));
                    }
                }
                expect_operand = true;
            }
            RightBrace => {
                let empty_call = previous == Some(LeftBrace);
                pop_operators(&mut stack, &mut output);
                let Some(StackEntry::Group {
                    function, commas, ..
                }) = stack.pop()
                else {
                    return Err(syntax_error(
                        SyntaxErrorCode::UnexpectedCloseParenthesis,
                        "Unexpected ')'",
                        position,
                    ));
                };

                match function {
                    Some(mut function) => {
                        if expect_operand && !empty_call {
                            return Err(missing_operand(position));
                        }
                        function.arguments = if empty_call { 0 } else { commas + 1 };
                        output.push(function);
                    }
                    None if expect_operand => return Err(missing_operand(position)),
                    None => {}
                }
                expect_operand = false;
            }
            LeftSquareBrace => {
                if expect_operand {
                    return Err(missing_operand(position));
                }
                stack.push(StackEntry::Square(position));
                expect_operand = true;
            }
            RightSquareBrace => {
                if expect_operand {
                    return Err(missing_operand(position));
                }
                pop_operators(&mut stack, &mut output);
                let Some(StackEntry::Square(open)) = stack.pop() else {
                    return Err(syntax_error(
                        SyntaxErrorCode::UnexpectedCloseSquareBracket,
                        "Unexpected ']'",
                        position,
                    ));
                };
                output.push(ExpressionToken::operator(Element, open));
                expect_operand = false;
            }
            IsNull | IsNotNull => {
                if expect_operand {
                    return Err(missing_operand(position));
                }
                pop_binding(&mut stack, &mut output, token.kind);
                output.push(token.clone());
            }
            Unary | Not => {
                if !expect_operand {
                    return Err(missing_operator(position));
                }
                stack.push(StackEntry::Operator(token.clone()));
            }
            kind if kind.is_binary_operator() => {
                if expect_operand {
                    return Err(missing_operand(position));
                }
                pop_binding(&mut stack, &mut output, kind);
                stack.push(StackEntry::Operator(token.clone()));
                expect_operand = true;
            }
            kind => {
                return Err(syntax_error(
                    SyntaxErrorCode::Internal,
                    format!("Unexpected token {kind:?}"),
                    position,
                ));
            }
        }

        previous = Some(token.kind);
    }

    if expect_operand {
        if let Some(last) = tokens.last() {
            return Err(syntax_error(
                SyntaxErrorCode::UnexpectedEnd,
                "Unexpected end of expression",
                last.position(),
            ));
        }
    }

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Operator(token) => output.push(token),
            StackEntry::Group { open, .. } => {
                return Err(syntax_error(
                    SyntaxErrorCode::MissedCloseParenthesis,
                    "Missing ')'",
                    open,
                ));
            }
            StackEntry::Square(open) => {
                return Err(syntax_error(
                    SyntaxErrorCode::MissedCloseSquareBracket,
                    "Missing ']'",
                    open,
                ));
            }
        }
    }

    Ok(output)
}

fn missing_operand(position: Position) -> SyntaxError {
    syntax_error(SyntaxErrorCode::MissingOperand, "Missing operand", position)
}

fn missing_operator(position: Position) -> SyntaxError {
    syntax_error(SyntaxErrorCode::MissingOperator, "Missing operator", position)
}

/// Moves every operator above the innermost open bracket to the output.
fn pop_operators(stack: &mut Vec<StackEntry>, output: &mut Vec<ExpressionToken>) {
    while let Some(StackEntry::Operator(_)) = stack.last() {
        if let Some(StackEntry::Operator(token)) = stack.pop() {
            output.push(token);
        }
    }
}

/// Moves operators that bind at least as tightly as `incoming` to the output.
fn pop_binding(
    stack: &mut Vec<StackEntry>,
    output: &mut Vec<ExpressionToken>,
    incoming: ExpressionTokenType,
) {
    let incoming_level = precedence(incoming).unwrap_or(0);
    let left_associative = associativity(incoming) == Associativity::Left;

    while let Some(StackEntry::Operator(top)) = stack.last() {
        let top_level = precedence(top.kind).unwrap_or(0);
        let pops = top_level > incoming_level || (top_level == incoming_level && left_associative);
        if !pops {
            break;
        }
        if let Some(StackEntry::Operator(token)) = stack.pop() {
            output.push(token);
        }
    }
}

#[test]
fn test_parse_float_prefers_single_precision() {
    let position = Position::default();
    assert_eq!(parse_float("1.5", position), Ok(Variant::Float(1.5)));
    assert_eq!(parse_float("123e45", position), Ok(Variant::Double(123e45)));
    assert_eq!(parse_integer("3000000000", position), Ok(Variant::Long(3_000_000_000)));
}
