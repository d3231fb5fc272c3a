//! Named variables consulted during evaluation.
//!
//! Names are matched ignoring ASCII case, so `A` and `a` are the same
//! variable. The first spelling added is the one kept.

use crate::value::Variant;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variable {
    pub name: String,
    pub value: Variant,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: impl Into<Variant>) -> Self {
        Variable {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Lookup interface the calculator evaluates against.
pub trait VariableRegistry {
    fn find_by_name(&self, name: &str) -> Option<&Variable>;
}

/// An ordered, case-insensitive collection of variables.
#[derive(Debug, Clone, Default)]
pub struct VariableCollection {
    variables: Vec<Variable>,
}

impl VariableCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `variable`, replacing the value of an existing one with the same
    /// name.
    pub fn add(&mut self, variable: Variable) {
        match self.find_by_name_mut(&variable.name) {
            Some(existing) => existing.value = variable.value,
            None => self.variables.push(variable),
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Variable> {
        self.variables
            .iter()
            .find(|variable| variable.name.eq_ignore_ascii_case(name))
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables
            .iter_mut()
            .find(|variable| variable.name.eq_ignore_ascii_case(name))
    }

    /// Sets the value of `name`, creating the variable if needed.
    pub fn set_value(&mut self, name: &str, value: impl Into<Variant>) {
        self.add(Variable::new(name, value));
    }

    pub fn remove(&mut self, name: &str) -> Option<Variable> {
        let index = self
            .variables
            .iter()
            .position(|variable| variable.name.eq_ignore_ascii_case(name))?;
        Some(self.variables.remove(index))
    }

    pub fn clear(&mut self) {
        self.variables.clear();
    }

    /// Resets every value to Null, keeping the names.
    pub fn clear_values(&mut self) {
        for variable in &mut self.variables {
            variable.value = Variant::Null;
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }
}

impl VariableRegistry for VariableCollection {
    fn find_by_name(&self, name: &str) -> Option<&Variable> {
        VariableCollection::find_by_name(self, name)
    }
}

impl<'a> IntoIterator for &'a VariableCollection {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}

impl FromIterator<Variable> for VariableCollection {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        let mut collection = VariableCollection::new();
        for variable in iter {
            collection.add(variable);
        }
        collection
    }
}
