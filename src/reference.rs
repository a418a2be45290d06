//! Value references: literal parameters or back-references into the DataSet.

use crate::dataset::DataSet;
use crate::path::FieldPath;
use crate::value::Value;

/// Marker prefix identifying a path reference in a raw parameter value.
pub const REFERENCE_MARKER: char = '@';

/// A field parameter: either a literal, or a reference to the parsed value of
/// a field that occurs strictly earlier in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueRef {
    Literal(Value),
    Path(FieldPath),
}

impl ValueRef {
    /// Classifies a raw definition parameter. A string starting with `@` is a
    /// path reference on the remainder (full hierarchical path); everything
    /// else is a literal.
    pub fn from_raw(raw: &Value) -> Self {
        match raw {
            Value::Str(s) if s.starts_with(REFERENCE_MARKER) => {
                ValueRef::Path(FieldPath::parse(&s[1..]))
            }
            other => ValueRef::Literal(other.clone()),
        }
    }

    /// Resolves against the values populated so far. A path reference fails
    /// with the missing path if it names a field with no value yet; a forward
    /// or self reference is indistinguishable from a typo here, and both
    /// abort the pass.
    pub fn resolve<'a>(&'a self, data: &'a DataSet) -> Result<&'a Value, &'a FieldPath> {
        match self {
            ValueRef::Literal(value) => Ok(value),
            ValueRef::Path(path) => data.get(path).ok_or(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_literal() {
        assert_eq!(ValueRef::from_raw(&Value::UInt(4)), ValueRef::Literal(Value::UInt(4)));
        assert_eq!(
            ValueRef::from_raw(&Value::Str("big".to_string())),
            ValueRef::Literal(Value::Str("big".to_string()))
        );
    }

    #[test]
    fn test_from_raw_reference() {
        assert_eq!(
            ValueRef::from_raw(&Value::Str("@header/length".to_string())),
            ValueRef::Path(FieldPath::parse("header/length"))
        );
    }

    #[test]
    fn test_resolve_literal_never_fails() {
        let data = DataSet::new();
        let vref = ValueRef::Literal(Value::UInt(7));
        assert_eq!(vref.resolve(&data), Ok(&Value::UInt(7)));
    }

    #[test]
    fn test_resolve_populated_path() {
        let mut data = DataSet::new();
        data.insert(FieldPath::parse("header/length"), Value::UInt(3))
            .unwrap();

        let vref = ValueRef::Path(FieldPath::parse("header/length"));
        assert_eq!(vref.resolve(&data), Ok(&Value::UInt(3)));
    }

    #[test]
    fn test_resolve_unpopulated_path_fails() {
        let data = DataSet::new();
        let vref = ValueRef::Path(FieldPath::parse("header/length"));
        assert_eq!(vref.resolve(&data), Err(&FieldPath::parse("header/length")));
    }
}
