//! In-memory definition tree: the declarative input to
//! [crate::schema::Schema::build].

use std::collections::BTreeMap;

use crate::value::Value;

/// Type tag of the structural compound field.
pub const COMPOUND_TAG: &str = "compound";

/// One named node of a schema definition. Immutable once loaded.
///
/// A node has exactly one type tag, and only nodes tagged [COMPOUND_TAG] may
/// carry children. Any parameter whose value is a string starting with `@` is
/// a back-reference to a previously declared field, named by its full
/// hierarchical path (`/`- or `.`-delimited).
#[derive(Debug, Clone, PartialEq)]
pub struct DefNode {
    pub name: String,
    /// Type tag naming a codec in the registry, or [COMPOUND_TAG].
    pub type_tag: String,
    /// Type-specific parameters: literals or `@`-prefixed references.
    pub params: BTreeMap<String, Value>,
    /// Child nodes, in declaration order. Only valid on compound nodes.
    pub children: Vec<DefNode>,
    /// Validators to run against the parsed value, in order.
    pub validators: Vec<ValidatorSpec>,
}

impl DefNode {
    /// Leaf node with no parameters or validators.
    pub fn leaf(name: &str, type_tag: &str) -> Self {
        DefNode {
            name: name.to_string(),
            type_tag: type_tag.to_string(),
            params: BTreeMap::new(),
            children: Vec::new(),
            validators: Vec::new(),
        }
    }

    /// Compound node owning `children` in declaration order.
    pub fn compound(name: &str, children: Vec<DefNode>) -> Self {
        DefNode {
            name: name.to_string(),
            type_tag: COMPOUND_TAG.to_string(),
            params: BTreeMap::new(),
            children,
            validators: Vec::new(),
        }
    }

    /// Adds a parameter.
    pub fn with_param(mut self, name: &str, value: Value) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }

    /// Attaches a validator by registry tag.
    pub fn with_validator(mut self, tag: &str, arg: Value) -> Self {
        self.validators.push(ValidatorSpec {
            tag: tag.to_string(),
            arg,
        });
        self
    }
}

/// Validator attachment in a definition: a registry tag plus its argument
/// (the desired value, a bound, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorSpec {
    pub tag: String,
    pub arg: Value,
}
