use crate::value::Variant;

/// LIFO buffer of values used while walking a postfix token stream.
#[derive(Debug, Clone, Default)]
pub struct CalculationStack {
    values: Vec<Variant>,
}

impl CalculationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, value: Variant) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Option<Variant> {
        self.values.pop()
    }

    /// Removes the top `count` values and returns them bottom first, or
    /// `None` (leaving the stack untouched) when fewer are available.
    pub fn pop_many(&mut self, count: usize) -> Option<Vec<Variant>> {
        let start = self.values.len().checked_sub(count)?;
        Some(self.values.split_off(start))
    }

    pub fn peek(&self) -> Option<&Variant> {
        self.values.last()
    }

    /// Value at `index`, counted from the bottom of the stack.
    pub fn peek_at(&self, index: usize) -> Option<&Variant> {
        self.values.get(index)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[test]
fn test_pop_many_keeps_argument_order() {
    let mut stack = CalculationStack::new();
    for value in 1..=4 {
        stack.push(Variant::Integer(value));
    }

    let args = stack.pop_many(3).unwrap();
    assert_eq!(args, vec![Variant::Integer(2), Variant::Integer(3), Variant::Integer(4)]);
    assert_eq!(stack.peek(), Some(&Variant::Integer(1)));
    assert_eq!(stack.peek_at(0), Some(&Variant::Integer(1)));
    assert!(stack.pop_many(2).is_none());
    assert_eq!(stack.len(), 1);
}
