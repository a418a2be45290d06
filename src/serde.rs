//! Serde-deserializable schema description.
//!
//! These types mirror the external definition notation: every node carries a
//! `_type` tag, compound nodes list their children under `_fields`, validator
//! attachments live under `_validators`, and any remaining key is a
//! type-specific parameter. String parameters starting with `@` are
//! back-references to earlier fields. Convert into
//! [crate::definition::DefNode] and hand the result to
//! [crate::schema::Schema::build].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::definition::{DefNode, ValidatorSpec};
use crate::value::Value;

/// Top-level definition: named nodes in declaration order. Declaration order
/// is on-wire order, so the nodes are a list, not a map.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchemaDef {
    pub fields: Vec<NodeDef>,
}

/// One named node of the external definition.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NodeDef {
    /// Field name; becomes one path segment.
    pub name: String,
    /// Registered type tag, or `compound`.
    #[serde(rename = "_type")]
    pub type_tag: String,
    /// Child nodes; permitted only on compound nodes.
    #[serde(rename = "_fields", default)]
    pub fields: Vec<NodeDef>,
    /// Validators to attach, in order.
    #[serde(rename = "_validators", default)]
    pub validators: Vec<ValidatorDef>,
    /// Every remaining key: a type-specific parameter.
    #[serde(flatten)]
    pub params: BTreeMap<String, ParamDef>,
}

/// Validator attachment: a registry tag plus its argument.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ValidatorDef {
    pub tag: String,
    pub arg: ParamDef,
}

/// Literal parameter value as it appears in the external notation.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum ParamDef {
    UInt(u64),
    Int(i64),
    Str(String),
}

impl From<ParamDef> for Value {
    fn from(value: ParamDef) -> Self {
        match value {
            ParamDef::UInt(v) => Value::UInt(v),
            ParamDef::Int(v) => Value::Int(v),
            ParamDef::Str(v) => Value::Str(v),
        }
    }
}

impl From<NodeDef> for DefNode {
    fn from(value: NodeDef) -> Self {
        DefNode {
            name: value.name,
            type_tag: value.type_tag,
            params: value
                .params
                .into_iter()
                .map(|(name, param)| (name, param.into()))
                .collect(),
            children: value.fields.into_iter().map(Into::into).collect(),
            validators: value
                .validators
                .into_iter()
                .map(|v| ValidatorSpec {
                    tag: v.tag,
                    arg: v.arg.into(),
                })
                .collect(),
        }
    }
}

impl From<SchemaDef> for Vec<DefNode> {
    fn from(value: SchemaDef) -> Self {
        value.fields.into_iter().map(Into::into).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::schema::Schema;
    use crate::stream::BufStream;

    const LENGTH_PREFIXED: &str = r#"{
        "fields": [
            {
                "name": "header",
                "_type": "compound",
                "_fields": [
                    {
                        "name": "length",
                        "_type": "uint8",
                        "_validators": [{ "tag": "max", "arg": 16 }]
                    },
                    {
                        "name": "payload",
                        "_type": "bytes",
                        "size": "@header/length"
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_deserialize_definition() {
        let def: SchemaDef = serde_json::from_str(LENGTH_PREFIXED).unwrap();
        let nodes: Vec<DefNode> = def.into();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].type_tag, "compound");
        assert_eq!(nodes[0].children.len(), 2);
        assert_eq!(
            nodes[0].children[1].params.get("size"),
            Some(&Value::Str("@header/length".to_string()))
        );
        assert_eq!(nodes[0].children[0].validators[0].tag, "max");
        assert_eq!(nodes[0].children[0].validators[0].arg, Value::UInt(16));
    }

    #[test]
    fn test_build_and_read_from_json_definition() {
        let def: SchemaDef = serde_json::from_str(LENGTH_PREFIXED).unwrap();
        let nodes: Vec<DefNode> = def.into();
        let schema = Schema::build(&Registry::with_builtins(), &nodes).unwrap();

        let mut stream = BufStream::from_bytes(vec![0x02, 0xca, 0xfe]);
        let data = schema.read(&mut stream).unwrap();
        assert_eq!(data.lookup("header/payload"), Some(&Value::Bytes(vec![0xca, 0xfe])));
    }

    #[test]
    fn test_validator_from_json_definition_rejects() {
        let def: SchemaDef = serde_json::from_str(LENGTH_PREFIXED).unwrap();
        let nodes: Vec<DefNode> = def.into();
        let schema = Schema::build(&Registry::with_builtins(), &nodes).unwrap();

        // length 17 violates the max(16) validator before payload is read.
        let mut stream = BufStream::from_bytes(vec![0x11; 32]);
        assert!(matches!(
            schema.read(&mut stream),
            Err(crate::errors::ReadError::ValidationFailed { .. })
        ));
    }
}
