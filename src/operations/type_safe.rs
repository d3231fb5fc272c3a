use crate::error::ExpressionError;
use crate::value::{Variant, VariantType};

use super::VariantOperations;

/// Strict strategy: values never change kind, so operands must already
/// agree (`1 + 2` works, `1 + 2.5` and `'a' + 1` fail).
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeSafeOperations;

impl VariantOperations for TypeSafeOperations {
    fn convert(&self, value: &Variant, target: VariantType) -> Result<Variant, ExpressionError> {
        if value.kind() == target || value.is_null() {
            return Ok(value.clone());
        }
        if target == VariantType::Null {
            return Ok(Variant::Null);
        }
        Err(ExpressionError::conversion(
            value.kind(),
            target,
            "implicit conversions are disabled",
        ))
    }
}
