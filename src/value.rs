//! Values produced by reading leaf fields, or supplied for writing them.

/// A parsed leaf value. Also the raw shape of literal definition parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    UInt(u64),
    Int(i64),
    Bytes(Vec<u8>),
    Str(String),
}

impl Value {
    /// Numeric value as a `usize`, if non-negative and in range. Size and
    /// count parameters are read through this.
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Value::UInt(v) => usize::try_from(*v).ok(),
            Value::Int(v) => usize::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Numeric value widened to `i128`, so unsigned and signed values compare
    /// under one type.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::UInt(v) => Some(*v as i128),
            Value::Int(v) => Some(*v as i128),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_usize_uint() {
        assert_eq!(Value::UInt(3).as_usize(), Some(3));
    }

    #[test]
    fn test_as_usize_negative_int() {
        assert_eq!(Value::Int(-1).as_usize(), None);
    }

    #[test]
    fn test_as_usize_non_numeric() {
        assert_eq!(Value::Str("3".to_string()).as_usize(), None);
        assert_eq!(Value::Bytes(vec![3]).as_usize(), None);
    }

    #[test]
    fn test_as_i128_widens_u64() {
        assert_eq!(Value::UInt(u64::MAX).as_i128(), Some(u64::MAX as i128));
        assert_eq!(Value::Int(-5).as_i128(), Some(-5));
    }
}
