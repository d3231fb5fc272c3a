use super::tokens::ExpressionTokenType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// Binding strength of an operator, higher binds tighter. `None` for tokens
/// that are not operators.
///
/// | Level | Operators                          |
/// |-------|------------------------------------|
/// | 1     | `OR`, `XOR`                        |
/// | 2     | `AND`                              |
/// | 3     | `NOT`                              |
/// | 4     | `= <> > < >= <=`, `IS [NOT] NULL`  |
/// | 5     | `IN`, `NOT IN`, `LIKE`, `NOT LIKE` |
/// | 6     | `<<`, `>>`                         |
/// | 7     | `+`, `-`                           |
/// | 8     | `*`, `/`, `%`                      |
/// | 9     | `^`                                |
/// | 10    | unary minus                        |
/// | 11    | element access `[]`                |
pub fn precedence(kind: ExpressionTokenType) -> Option<u8> {
    use ExpressionTokenType::*;
    let level = match kind {
        Or | Xor => 1,
        And => 2,
        Not => 3,
        Equal | NotEqual | More | Less | EqualMore | EqualLess | IsNull | IsNotNull => 4,
        In | NotIn | Like | NotLike => 5,
        ShiftLeft | ShiftRight => 6,
        Plus | Minus => 7,
        Star | Slash | Procent => 8,
        Power => 9,
        Unary => 10,
        Element => 11,
        _ => return None,
    };
    Some(level)
}

pub fn associativity(kind: ExpressionTokenType) -> Associativity {
    match kind {
        ExpressionTokenType::Power | ExpressionTokenType::Unary | ExpressionTokenType::Not => {
            Associativity::Right
        }
        _ => Associativity::Left,
    }
}

#[test]
fn test_power_binds_tighter_than_multiplication() {
    assert!(precedence(ExpressionTokenType::Power) > precedence(ExpressionTokenType::Star));
    assert!(precedence(ExpressionTokenType::Unary) > precedence(ExpressionTokenType::Power));
    assert_eq!(precedence(ExpressionTokenType::Constant), None);
    assert_eq!(associativity(ExpressionTokenType::Power), Associativity::Right);
}
