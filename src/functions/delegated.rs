use crate::error::ExpressionError;
use crate::operations::VariantOperations;
use crate::value::Variant;

use super::Function;

pub type FunctionCalculator = dyn Fn(&[Variant], &dyn VariantOperations) -> Result<Variant, ExpressionError>
    + Send
    + Sync;

/// A named function backed by a closure.
pub struct DelegatedFunction {
    name: String,
    calculator: Box<FunctionCalculator>,
}

impl DelegatedFunction {
    pub fn new<F>(name: impl Into<String>, calculator: F) -> Self
    where
        F: Fn(&[Variant], &dyn VariantOperations) -> Result<Variant, ExpressionError>
            + Send
            + Sync
            + 'static,
    {
        DelegatedFunction {
            name: name.into(),
            calculator: Box::new(calculator),
        }
    }
}

impl Function for DelegatedFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(
        &self,
        args: &[Variant],
        ops: &dyn VariantOperations,
    ) -> Result<Variant, ExpressionError> {
        (self.calculator)(args, ops)
    }
}

impl std::fmt::Debug for DelegatedFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatedFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
