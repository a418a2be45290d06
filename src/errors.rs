//! Error types for schema building, stream I/O, and read/write passes.
//!
//! Every pass-level error carries the full path of the field that failed.
//! The first error aborts the whole pass: binary layouts have no safe
//! mid-field recovery point.

use crate::path::FieldPath;
use crate::value::Value;

/// Errors produced when building a [crate::schema::Schema] from a definition tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A node's type tag has no codec registered in the [crate::registry::Registry].
    UnknownFieldType(String),
    /// A node is structurally invalid: children on a leaf, a missing required
    /// parameter, a duplicate sibling name, an unknown validator tag.
    MalformedDefinition {
        /// Name of the offending definition node.
        field: String,
        reason: String,
    },
}

/// Error returned by [crate::stream::Stream::read_bytes] when fewer bytes
/// remain than requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfStream {
    /// Number of bytes the caller asked for.
    pub requested: usize,
}

/// Error returned by [crate::stream::Stream::write_bytes] on a short write or
/// sink failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError(pub String);

/// Errors raised by a leaf codec ([crate::field::FieldType]) itself. The
/// read/write drivers wrap these with the failing field's full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Stream ran out of bytes mid-field.
    EndOfStream,
    /// Stream sink refused the bytes.
    Sink(String),
    /// A parameter the codec needs was not declared.
    MissingParameter(&'static str),
    /// A parameter resolved to an unusable value.
    BadParameter {
        name: &'static str,
        reason: String,
    },
    /// Consumed bytes do not decode (e.g. invalid UTF-8 in a text field).
    InvalidData(String),
    /// The dataset value cannot be encoded by this codec.
    InvalidValue(String),
}

impl From<EndOfStream> for FieldError {
    fn from(_: EndOfStream) -> Self {
        FieldError::EndOfStream
    }
}

impl From<SinkError> for FieldError {
    fn from(err: SinkError) -> Self {
        FieldError::Sink(err.0)
    }
}

/// Errors aborting a read pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Stream ended before the field got its bytes.
    EndOfStream { path: FieldPath },
    /// A parameter referenced a path with no value yet. A forward or self
    /// reference surfaces the same way as a misspelled path: order validity
    /// is a runtime property of the traversal, not of the static tree.
    UnresolvedReference {
        path: FieldPath,
        reference: FieldPath,
    },
    /// The field's path already holds a value in this pass.
    DuplicateKey { path: FieldPath },
    /// A validator rejected the parsed value.
    ValidationFailed {
        path: FieldPath,
        value: Value,
        reason: String,
    },
    /// The codec failed with a type-specific error.
    Codec { path: FieldPath, error: FieldError },
}

/// Errors aborting a write pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The supplied dataset lacks a value this field needs.
    MissingValue { path: FieldPath },
    /// A parameter referenced a path absent from the supplied dataset.
    UnresolvedReference {
        path: FieldPath,
        reference: FieldPath,
    },
    /// The stream sink failed while emitting this field.
    Sink { path: FieldPath, reason: String },
    /// The codec failed with a type-specific error.
    Codec { path: FieldPath, error: FieldError },
}
