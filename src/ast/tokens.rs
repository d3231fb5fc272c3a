use crate::reader::Position;
use crate::value::Variant;

/// Kind of a typed expression token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionTokenType {
    Unknown,

    // Grouping
    /// `(`
    LeftBrace,
    /// `)`
    RightBrace,
    /// `[`
    LeftSquareBrace,
    /// `]`
    RightSquareBrace,
    /// `,` between function arguments
    Comma,

    // Arithmetic
    /// Addition or string concatenation (`+`)
    Plus,
    /// Subtraction (`-`)
    Minus,
    /// Multiplication (`*`)
    Star,
    /// Division (`/`)
    Slash,
    /// Remainder (`%`)
    Procent,
    /// Power (`^`), right-associative
    Power,
    /// Unary minus
    ///
    /// # Examples
    /// ```text
    /// -A
    /// 2 * -3
    /// ```
    Unary,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,

    // Comparison
    /// `=`
    Equal,
    /// `<>` or `!=`
    NotEqual,
    /// `>`
    More,
    /// `<`
    Less,
    /// `>=`
    EqualMore,
    /// `<=`
    EqualLess,

    // Logical
    And,
    Or,
    Xor,
    Not,

    // Membership and null checks
    /// `IS` keyword before it is folded into `IsNull` / `IsNotNull`
    Is,
    /// `value IN Array(...)`
    In,
    /// `value NOT IN Array(...)`
    NotIn,
    /// `value LIKE 'pattern%'`
    Like,
    /// `value NOT LIKE 'pattern%'`
    NotLike,
    /// Postfix `IS NULL`
    IsNull,
    /// Postfix `IS NOT NULL`
    IsNotNull,
    /// `NULL` keyword before it becomes a constant
    Null,
    /// Element access, `collection[index]`
    ///
    /// # Examples
    /// ```text
    /// 'abc'[1]
    /// Array(1, 2, 3)[0]
    /// ```
    Element,

    // Leaves
    /// Call of a named function; the token records its argument count
    Function,
    /// Reference to a named variable
    Variable,
    /// Literal value
    Constant,
}

impl ExpressionTokenType {
    /// Binary operators pop two values when evaluated.
    pub fn is_binary_operator(&self) -> bool {
        use ExpressionTokenType::*;
        matches!(
            self,
            Plus | Minus
                | Star
                | Slash
                | Procent
                | Power
                | ShiftLeft
                | ShiftRight
                | Equal
                | NotEqual
                | More
                | Less
                | EqualMore
                | EqualLess
                | And
                | Or
                | Xor
                | In
                | NotIn
                | Like
                | NotLike
                | Element
        )
    }

    /// Unary operators pop one value when evaluated.
    pub fn is_unary_operator(&self) -> bool {
        use ExpressionTokenType::*;
        matches!(self, Unary | Not | IsNull | IsNotNull)
    }
}

/// A typed token of a parsed expression.
///
/// For `Variable` and `Function` tokens `value` holds the identifier as a
/// String; for `Constant` tokens it holds the literal. Equality ignores the
/// source position.
#[derive(Debug, Clone)]
pub struct ExpressionToken {
    pub kind: ExpressionTokenType,
    pub value: Variant,
    /// Number of arguments, for `Function` tokens.
    pub arguments: usize,
    pub line: usize,
    pub column: usize,
}

impl ExpressionToken {
    pub fn new(kind: ExpressionTokenType, value: Variant, position: Position) -> Self {
        ExpressionToken {
            kind,
            value,
            arguments: 0,
            line: position.line,
            column: position.column,
        }
    }

    pub fn operator(kind: ExpressionTokenType, position: Position) -> Self {
        Self::new(kind, Variant::Null, position)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Identifier of a `Variable` or `Function` token.
    pub fn name(&self) -> Option<&str> {
        self.value.as_string()
    }
}

impl PartialEq for ExpressionToken {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value && self.arguments == other.arguments
    }
}

impl std::fmt::Display for ExpressionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ExpressionTokenType::Function => {
                write!(f, "Function {}/{}", self.value, self.arguments)
            }
            ExpressionTokenType::Variable => write!(f, "Variable {}", self.value),
            ExpressionTokenType::Constant => match &self.value {
                Variant::String(text) => write!(f, "Constant {text:?}"),
                other => write!(f, "Constant {other} ({})", other.kind()),
            },
            kind => write!(f, "{kind:?}"),
        }
    }
}
