//! # binschema
//!
//! A declarative schema engine for structured binary streams.
//!
//! Describe a binary layout once as a tree of named, typed fields and get
//! both a decoder and an encoder. Field parameters are either literals or
//! `@`-prefixed back-references to the parsed value of an earlier field,
//! which covers layouts like length-prefixed payloads. A read pass walks the
//! schema in declaration order, consuming bytes and accumulating values into
//! an ordered, write-once [dataset::DataSet]; a write pass mirrors it,
//! emitting bytes from a caller-supplied dataset.
//!
//! ## Example
//!
//! ```
//! use binschema::definition::DefNode;
//! use binschema::registry::Registry;
//! use binschema::schema::Schema;
//! use binschema::stream::BufStream;
//! use binschema::value::Value;
//!
//! let definition = vec![DefNode::compound(
//!     "header",
//!     vec![
//!         DefNode::leaf("length", "uint8"),
//!         DefNode::leaf("payload", "bytes")
//!             .with_param("size", Value::Str("@header/length".into())),
//!     ],
//! )];
//!
//! let registry = Registry::with_builtins();
//! let schema = Schema::build(&registry, &definition).unwrap();
//!
//! let mut stream = BufStream::from_bytes(vec![0x03, 0x41, 0x42, 0x43]);
//! let data = schema.read(&mut stream).unwrap();
//!
//! assert_eq!(data.lookup("header/length"), Some(&Value::UInt(3)));
//! assert_eq!(
//!     data.lookup("header/payload"),
//!     Some(&Value::Bytes(vec![0x41, 0x42, 0x43]))
//! );
//! ```

pub mod dataset;
pub mod definition;
pub mod errors;
pub mod field;
pub mod path;
pub mod reference;
pub mod registry;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod stream;
pub mod types;
pub mod validator;
pub mod value;
