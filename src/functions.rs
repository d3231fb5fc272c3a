//! Functions callable from expressions.
//!
//! A function receives its already evaluated arguments in call order plus
//! the calculator's active [`VariantOperations`] strategy, so built-ins
//! convert and compare values the same way operators do.
//!
//! ```
//! use exprcalc::{
//!     DelegatedFunction, FunctionCollection, TypeUnsafeOperations, Variant, VariantOperations,
//! };
//!
//! let mut functions = FunctionCollection::default_functions();
//! functions.add(DelegatedFunction::new("Twice", |args, ops| ops.add(&args[0], &args[0])));
//!
//! let twice = functions.find_by_name("twice").unwrap();
//! let result = twice.calculate(&[Variant::from(21)], &TypeUnsafeOperations).unwrap();
//! assert_eq!(result, Variant::Integer(42));
//! ```
pub mod builtins;
pub mod delegated;

pub use delegated::{DelegatedFunction, FunctionCalculator};

use crate::error::ExpressionError;
use crate::operations::VariantOperations;
use crate::value::Variant;

pub trait Function: Send + Sync {
    fn name(&self) -> &str;

    fn calculate(
        &self,
        args: &[Variant],
        ops: &dyn VariantOperations,
    ) -> Result<Variant, ExpressionError>;
}

/// Lookup interface the calculator evaluates against.
pub trait FunctionRegistry {
    fn find_by_name(&self, name: &str) -> Option<&dyn Function>;
}

/// Functions keyed by name, ignoring ASCII case.
#[derive(Default)]
pub struct FunctionCollection {
    functions: Vec<Box<dyn Function>>,
}

impl FunctionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in library: math, aggregation, conditionals, dates and
    /// string helpers.
    pub fn default_functions() -> Self {
        let mut collection = FunctionCollection::new();
        builtins::register(&mut collection);
        collection
    }

    /// Adds `function`, replacing a function registered under the same name.
    pub fn add(&mut self, function: impl Function + 'static) {
        self.add_boxed(Box::new(function));
    }

    pub fn add_boxed(&mut self, function: Box<dyn Function>) {
        match self.position(function.name()) {
            Some(index) => self.functions[index] = function,
            None => self.functions.push(function),
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<&dyn Function> {
        self.position(name).map(|index| self.functions[index].as_ref())
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Function>> {
        self.position(name).map(|index| self.functions.remove(index))
    }

    pub fn clear(&mut self) {
        self.functions.clear();
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|function| function.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.functions
            .iter()
            .position(|function| function.name().eq_ignore_ascii_case(name))
    }
}

impl FunctionRegistry for FunctionCollection {
    fn find_by_name(&self, name: &str) -> Option<&dyn Function> {
        FunctionCollection::find_by_name(self, name)
    }
}

impl std::fmt::Debug for FunctionCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
