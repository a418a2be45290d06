//! Per-field value validators, run right after a leaf value is parsed.

use crate::value::Value;

/// Constraint checked against a parsed value during a read pass.
///
/// Validators run in attachment order, immediately after the field's value is
/// produced; the first failure aborts the pass. They never run during a write
/// pass: encoding assumes valid data.
pub trait Validator: Send + Sync {
    /// Ok to accept the value, Err with a reason to abort the pass.
    fn check(&self, value: &Value) -> Result<(), String>;
}

/// Accepts only one exact value. Typical use: magic numbers and version tags.
#[derive(Debug, Clone)]
pub struct Equals {
    pub desired: Value,
}

impl Validator for Equals {
    fn check(&self, value: &Value) -> Result<(), String> {
        if *value == self.desired {
            Ok(())
        } else {
            Err(format!("expected {:?}, got {:?}", self.desired, value))
        }
    }
}

/// Accepts numeric values greater than or equal to a bound.
#[derive(Debug, Clone)]
pub struct Min {
    pub bound: i64,
}

impl Validator for Min {
    fn check(&self, value: &Value) -> Result<(), String> {
        match value.as_i128() {
            Some(v) if v >= self.bound as i128 => Ok(()),
            Some(v) => Err(format!("{} is below the minimum {}", v, self.bound)),
            None => Err(format!("{:?} is not numeric", value)),
        }
    }
}

/// Accepts numeric values less than or equal to a bound.
#[derive(Debug, Clone)]
pub struct Max {
    pub bound: i64,
}

impl Validator for Max {
    fn check(&self, value: &Value) -> Result<(), String> {
        match value.as_i128() {
            Some(v) if v <= self.bound as i128 => Ok(()),
            Some(v) => Err(format!("{} is above the maximum {}", v, self.bound)),
            None => Err(format!("{:?} is not numeric", value)),
        }
    }
}
