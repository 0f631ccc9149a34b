//! Typed field access for rule evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar value as it appears in rule files: either a string or an integer.
///
/// Equality between values is type-sensitive, so `Integer(5)` never equals
/// `Text("5")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

/// A borrowed view of a record's current field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Integer(i64),
    Text(&'a str),
}

impl FieldRef<'_> {
    /// Strict equality: same runtime type and same value.
    pub fn equals(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (FieldRef::Integer(a), FieldValue::Integer(b)) => a == b,
            (FieldRef::Text(a), FieldValue::Text(b)) => *a == b.as_str(),
            _ => false,
        }
    }
}

/// A field that rules may name, for one record type.
pub trait RecordField: Copy + fmt::Debug + Send + Sync + 'static {
    /// Resolve a field by its wire name.
    fn from_name(name: &str) -> Option<Self>;

    /// The wire name of the field.
    fn name(self) -> &'static str;

    /// Whether `value` may be written to this field by a mutation.
    fn accepts(self, value: &FieldValue) -> bool;
}

/// A record the rule engine can read and mutate.
pub trait RuleTarget {
    type Field: RecordField;

    /// Current value of `field`, or `None` if the record doesn't carry it.
    fn get(&self, field: Self::Field) -> Option<FieldRef<'_>>;

    /// Overwrite `field`. Values rejected by [`RecordField::accepts`] are ignored.
    fn set(&mut self, field: Self::Field, value: &FieldValue);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_untagged() {
        let v: FieldValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, FieldValue::Integer(42));

        let v: FieldValue = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(v, FieldValue::Text("42".into()));

        assert!(serde_json::from_str::<FieldValue>("4.5").is_err());
        assert!(serde_json::from_str::<FieldValue>("null").is_err());
    }

    #[test]
    fn equality_is_type_sensitive() {
        assert!(FieldRef::Integer(5).equals(&FieldValue::Integer(5)));
        assert!(!FieldRef::Integer(5).equals(&FieldValue::Text("5".into())));
        assert!(!FieldRef::Text("5").equals(&FieldValue::Integer(5)));
        assert!(FieldRef::Text("7A").equals(&FieldValue::Text("7A".into())));
    }

    #[test]
    fn display() {
        assert_eq!(FieldValue::Integer(-3).to_string(), "-3");
        assert_eq!(FieldValue::from("abc").to_string(), "abc");
    }
}
