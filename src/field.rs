//! Built field tree and the codec contract that leaf types implement.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::dataset::DataSet;
use crate::errors::{FieldError, ReadError, WriteError};
use crate::path::FieldPath;
use crate::reference::ValueRef;
use crate::stream::Stream;
use crate::validator::Validator;
use crate::value::Value;

/// Codec contract for leaf field types: how one value is decoded from and
/// encoded to the stream.
///
/// Implementations are stateless and shared across fields; all per-field
/// configuration arrives through `params`, already resolved against the
/// values parsed so far. This is the single hook through which
/// back-references influence parsing.
pub trait FieldType: Send + Sync {
    /// Parameters that must be declared for this type, checked at build time.
    fn required_params(&self) -> &'static [&'static str] {
        &[]
    }

    /// Consumes bytes from the stream and produces the field's value.
    fn read(&self, stream: &mut dyn Stream, params: &Params) -> Result<Value, FieldError>;

    /// Encodes `value` onto the stream.
    fn write(
        &self,
        stream: &mut dyn Stream,
        value: &Value,
        params: &Params,
    ) -> Result<(), FieldError>;
}

/// Parameters of one field, resolved immediately before the codec runs.
#[derive(Debug, Clone, Default)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Parameter as a non-negative size. A missing parameter and a mistyped
    /// one are distinct errors, so diagnostics can tell a bad definition from
    /// bad data.
    pub fn require_usize(&self, name: &'static str) -> Result<usize, FieldError> {
        let value = self.0.get(name).ok_or(FieldError::MissingParameter(name))?;
        value.as_usize().ok_or_else(|| FieldError::BadParameter {
            name,
            reason: format!("expected a non-negative size, got {:?}", value),
        })
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Params(iter.into_iter().collect())
    }
}

/// One built field of a schema: a leaf that codes a single value, or a
/// compound that owns an ordered list of children and only orchestrates them.
///
/// Immutable after build; the only side effects of a pass are on the DataSet
/// and the stream cursor.
pub struct Field {
    name: String,
    path: FieldPath,
    kind: FieldKind,
}

pub(crate) enum FieldKind {
    Leaf {
        codec: Arc<dyn FieldType>,
        params: BTreeMap<String, ValueRef>,
        validators: Vec<Box<dyn Validator>>,
    },
    Compound {
        children: Vec<Field>,
    },
}

impl Field {
    pub(crate) fn new(name: String, path: FieldPath, kind: FieldKind) -> Self {
        Field { name, path, kind }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of this field within the schema.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    fn resolve_params(
        params: &BTreeMap<String, ValueRef>,
        data: &DataSet,
    ) -> Result<Params, FieldPath> {
        let mut resolved = BTreeMap::new();

        for (name, vref) in params {
            match vref.resolve(data) {
                Ok(value) => {
                    resolved.insert(name.clone(), value.clone());
                }
                Err(missing) => return Err(missing.clone()),
            }
        }

        Ok(Params(resolved))
    }

    /// Reads this field (and, for compounds, its whole subtree) from the
    /// stream, recording values into `data` in traversal order.
    pub(crate) fn read(
        &self,
        stream: &mut dyn Stream,
        data: &mut DataSet,
    ) -> Result<(), ReadError> {
        match &self.kind {
            FieldKind::Leaf {
                codec,
                params,
                validators,
            } => {
                let resolved = Self::resolve_params(params, data).map_err(|reference| {
                    ReadError::UnresolvedReference {
                        path: self.path.clone(),
                        reference,
                    }
                })?;

                let value = codec.read(stream, &resolved).map_err(|error| match error {
                    FieldError::EndOfStream => ReadError::EndOfStream {
                        path: self.path.clone(),
                    },
                    error => ReadError::Codec {
                        path: self.path.clone(),
                        error,
                    },
                })?;

                for validator in validators {
                    validator
                        .check(&value)
                        .map_err(|reason| ReadError::ValidationFailed {
                            path: self.path.clone(),
                            value: value.clone(),
                            reason,
                        })?;
                }

                data.insert(self.path.clone(), value)
                    .map_err(|duplicate| ReadError::DuplicateKey { path: duplicate.0 })?;
            }
            FieldKind::Compound { children } => {
                for child in children {
                    child.read(stream, data)?;
                }
            }
        }

        Ok(())
    }

    /// Writes this field (and subtree) to the stream, taking values from the
    /// supplied `data`. Mirrors [Field::read]: same order, same parameter
    /// resolution.
    pub(crate) fn write(&self, stream: &mut dyn Stream, data: &DataSet) -> Result<(), WriteError> {
        match &self.kind {
            FieldKind::Leaf { codec, params, .. } => {
                let resolved = Self::resolve_params(params, data).map_err(|reference| {
                    WriteError::UnresolvedReference {
                        path: self.path.clone(),
                        reference,
                    }
                })?;

                let value = data.get(&self.path).ok_or_else(|| WriteError::MissingValue {
                    path: self.path.clone(),
                })?;

                codec
                    .write(stream, value, &resolved)
                    .map_err(|error| match error {
                        FieldError::Sink(reason) => WriteError::Sink {
                            path: self.path.clone(),
                            reason,
                        },
                        error => WriteError::Codec {
                            path: self.path.clone(),
                            error,
                        },
                    })?;
            }
            FieldKind::Compound { children } => {
                for child in children {
                    child.write(stream, data)?;
                }
            }
        }

        Ok(())
    }
}
