//! Registry mapping definition type tags to field codecs, and validator tags
//! to factories.
//!
//! Passed explicitly into [crate::schema::Schema::build], so construction is
//! deterministic and testable without process-wide state. An unregistered
//! type tag surfaces only as [crate::errors::BuildError::UnknownFieldType].

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::field::FieldType;
use crate::types::{BytesCodec, IntCodec, TextCodec};
use crate::validator::{Equals, Max, Min, Validator};
use crate::value::Value;

/// Builds a validator from its definition argument. A factory error becomes
/// [crate::errors::BuildError::MalformedDefinition].
pub type ValidatorFactory =
    Box<dyn Fn(&Value) -> Result<Box<dyn Validator>, String> + Send + Sync>;

/// The set of field and validator implementations a schema may be built from.
pub struct Registry {
    fields: BTreeMap<String, Arc<dyn FieldType>>,
    validators: BTreeMap<String, ValidatorFactory>,
}

impl Registry {
    /// Empty registry. Use [Registry::with_builtins] for the stock set.
    pub fn new() -> Self {
        Registry {
            fields: BTreeMap::new(),
            validators: BTreeMap::new(),
        }
    }

    /// Registry pre-loaded with the built-in codecs (`uint8`..`uint64`,
    /// `int8`..`int64`, `bytes`, `text`) and validators (`equals`, `min`,
    /// `max`).
    pub fn with_builtins() -> Self {
        let mut registry = Registry::new();

        for (tag, width, signed) in [
            ("uint8", 1usize, false),
            ("uint16", 2, false),
            ("uint32", 4, false),
            ("uint64", 8, false),
            ("int8", 1, true),
            ("int16", 2, true),
            ("int32", 4, true),
            ("int64", 8, true),
        ] {
            registry.register_field(tag, Arc::new(IntCodec { width, signed }));
        }
        registry.register_field("bytes", Arc::new(BytesCodec));
        registry.register_field("text", Arc::new(TextCodec));

        registry.register_validator("equals", |arg| {
            Ok(Box::new(Equals {
                desired: arg.clone(),
            }))
        });
        registry.register_validator("min", |arg| {
            Ok(Box::new(Min {
                bound: numeric_bound(arg)?,
            }))
        });
        registry.register_validator("max", |arg| {
            Ok(Box::new(Max {
                bound: numeric_bound(arg)?,
            }))
        });

        registry
    }

    /// Registers (or replaces) the codec for `tag`.
    pub fn register_field(&mut self, tag: &str, codec: Arc<dyn FieldType>) {
        self.fields.insert(tag.to_string(), codec);
    }

    /// Registers (or replaces) the validator factory for `tag`.
    pub fn register_validator<F>(&mut self, tag: &str, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn Validator>, String> + Send + Sync + 'static,
    {
        self.validators.insert(tag.to_string(), Box::new(factory));
    }

    pub(crate) fn field(&self, tag: &str) -> Option<&Arc<dyn FieldType>> {
        self.fields.get(tag)
    }

    pub(crate) fn validator(
        &self,
        tag: &str,
        arg: &Value,
    ) -> Option<Result<Box<dyn Validator>, String>> {
        self.validators.get(tag).map(|factory| factory(arg))
    }
}

fn numeric_bound(arg: &Value) -> Result<i64, String> {
    match arg {
        Value::UInt(v) => i64::try_from(*v).map_err(|_| format!("bound {} is out of range", v)),
        Value::Int(v) => Ok(*v),
        other => Err(format!("expected a numeric bound, got {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_registered() {
        let registry = Registry::with_builtins();
        for tag in ["uint8", "uint16", "uint32", "uint64", "int8", "bytes", "text"] {
            assert!(registry.field(tag).is_some(), "missing builtin {}", tag);
        }
        assert!(registry.field("float32").is_none());
    }

    #[test]
    fn test_validator_factory_lookup() {
        let registry = Registry::with_builtins();
        assert!(registry.validator("equals", &Value::UInt(1)).unwrap().is_ok());
        assert!(registry.validator("nope", &Value::UInt(1)).is_none());
    }

    #[test]
    fn test_bound_factory_rejects_non_numeric_arg() {
        let registry = Registry::with_builtins();
        let built = registry
            .validator("min", &Value::Str("low".to_string()))
            .unwrap();
        assert!(built.is_err());
    }

    #[test]
    fn test_custom_registration_overrides() {
        let mut registry = Registry::new();
        registry.register_field("blob", Arc::new(BytesCodec));
        assert!(registry.field("blob").is_some());
        assert!(registry.field("uint8").is_none());
    }
}
