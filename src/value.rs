use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

/// The kind tag of a [`Variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantType {
    Null,
    Integer,
    Long,
    Boolean,
    Float,
    Double,
    String,
    DateTime,
    TimeSpan,
    Object,
    Array,
}

impl VariantType {
    pub fn name(&self) -> &'static str {
        match self {
            VariantType::Null => "Null",
            VariantType::Integer => "Integer",
            VariantType::Long => "Long",
            VariantType::Boolean => "Boolean",
            VariantType::Float => "Float",
            VariantType::Double => "Double",
            VariantType::String => "String",
            VariantType::DateTime => "DateTime",
            VariantType::TimeSpan => "TimeSpan",
            VariantType::Object => "Object",
            VariantType::Array => "Array",
        }
    }
}

impl std::fmt::Display for VariantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed value flowing through expression evaluation.
///
/// The enum tag always matches the payload, so there is no separate type
/// field to keep in sync. Typed accessors return `None` on a kind mismatch;
/// conversions between kinds are the job of a
/// [`VariantOperations`](crate::operations::VariantOperations) strategy.
///
/// # Examples
///
/// ```
/// use exprcalc::{Variant, VariantType};
///
/// let number = Variant::from(42);
/// assert_eq!(number.kind(), VariantType::Integer);
/// assert_eq!(number.as_integer(), Some(42));
/// assert_eq!(number.as_string(), None);
///
/// let list = Variant::from(vec![Variant::from("a"), Variant::Null]);
/// assert_eq!(list.length(), 2);
/// assert!(Variant::Null.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    #[default]
    Null,
    Integer(i32),
    Long(i64),
    Boolean(bool),
    Float(f32),
    Double(f64),
    String(String),
    DateTime(DateTime<Utc>),
    /// A signed duration.
    TimeSpan(TimeDelta),
    /// Opaque host data.
    Object(serde_json::Value),
    Array(Vec<Variant>),
}

impl Variant {
    pub fn kind(&self) -> VariantType {
        match self {
            Variant::Null => VariantType::Null,
            Variant::Integer(_) => VariantType::Integer,
            Variant::Long(_) => VariantType::Long,
            Variant::Boolean(_) => VariantType::Boolean,
            Variant::Float(_) => VariantType::Float,
            Variant::Double(_) => VariantType::Double,
            Variant::String(_) => VariantType::String,
            Variant::DateTime(_) => VariantType::DateTime,
            Variant::TimeSpan(_) => VariantType::TimeSpan,
            Variant::Object(_) => VariantType::Object,
            Variant::Array(_) => VariantType::Array,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    /// True for Null, an empty String and an empty Array.
    pub fn is_empty(&self) -> bool {
        match self {
            Variant::Null => true,
            Variant::String(value) => value.is_empty(),
            Variant::Array(values) => values.is_empty(),
            _ => false,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Variant::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Variant::Long(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Variant::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Variant::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Variant::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Variant::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Variant::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timespan(&self) -> Option<TimeDelta> {
        match self {
            Variant::TimeSpan(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&serde_json::Value> {
        match self {
            Variant::Object(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Variant]> {
        match self {
            Variant::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Variant>> {
        match self {
            Variant::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Any integral or floating payload widened to `f64`.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Variant::Integer(value) => Some(f64::from(*value)),
            Variant::Long(value) => Some(*value as f64),
            Variant::Float(value) => Some(f64::from(*value)),
            Variant::Double(value) => Some(*value),
            _ => None,
        }
    }

    /// Number of array elements, or characters of a string; zero otherwise.
    pub fn length(&self) -> usize {
        match self {
            Variant::Array(values) => values.len(),
            Variant::String(value) => value.chars().count(),
            _ => 0,
        }
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Variant> {
        self.as_array().and_then(|values| values.get(index))
    }

    /// Stores `value` at `index`, turning a non-array into an empty array
    /// first and padding with Nulls as needed.
    pub fn set_by_index(&mut self, index: usize, value: Variant) {
        if !matches!(self, Variant::Array(_)) {
            *self = Variant::Array(Vec::new());
        }
        if let Variant::Array(values) = self {
            if values.len() <= index {
                values.resize(index + 1, Variant::Null);
            }
            values[index] = value;
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Null => f.write_str("null"),
            Variant::Integer(value) => write!(f, "{value}"),
            Variant::Long(value) => write!(f, "{value}"),
            Variant::Boolean(value) => write!(f, "{value}"),
            Variant::Float(value) => write!(f, "{value}"),
            Variant::Double(value) => write!(f, "{value}"),
            Variant::String(value) => f.write_str(value),
            Variant::DateTime(value) => {
                f.write_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Variant::TimeSpan(value) => write!(f, "{}", value.num_milliseconds()),
            Variant::Object(value) => write!(f, "{value}"),
            Variant::Array(values) => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i32> for Variant {
    fn from(value: i32) -> Self {
        Variant::Integer(value)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Variant::Long(value)
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Boolean(value)
    }
}

impl From<f32> for Variant {
    fn from(value: f32) -> Self {
        Variant::Float(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Double(value)
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Variant {
    fn from(value: DateTime<Utc>) -> Self {
        Variant::DateTime(value)
    }
}

impl From<TimeDelta> for Variant {
    fn from(value: TimeDelta) -> Self {
        Variant::TimeSpan(value)
    }
}

impl From<serde_json::Value> for Variant {
    fn from(value: serde_json::Value) -> Self {
        Variant::Object(value)
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(values: Vec<Variant>) -> Self {
        Variant::Array(values)
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    fn from(value: Option<T>) -> Self {
        value.map_or(Variant::Null, Into::into)
    }
}

#[test]
fn test_set_by_index_pads_with_nulls() {
    let mut value = Variant::Null;
    value.set_by_index(2, Variant::from(7));
    assert_eq!(
        value,
        Variant::Array(vec![Variant::Null, Variant::Null, Variant::Integer(7)])
    );
}
