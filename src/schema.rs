//! Schema: built field tree driving full read and write passes over a stream.

use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::DataSet;
use crate::definition::{COMPOUND_TAG, DefNode};
use crate::errors::{BuildError, ReadError, WriteError};
use crate::field::{Field, FieldKind};
use crate::path::FieldPath;
use crate::reference::ValueRef;
use crate::registry::Registry;
use crate::stream::Stream;

/// A built schema: ordered top-level fields. Build once, then run any number
/// of independent read/write passes; all pass-local state lives in the
/// DataSet and the stream cursor.
pub struct Schema {
    fields: Vec<Field>,
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field(
                "fields",
                &self.fields.iter().map(Field::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Schema {
    /// Builds a schema from a definition tree, depth-first. A node is fully
    /// built, children included, before it is attached to its parent, so a
    /// later sibling's back-reference can name anything built before it.
    pub fn build(registry: &Registry, definition: &[DefNode]) -> Result<Self, BuildError> {
        let fields = build_level(registry, definition, &FieldPath::root())?;
        Ok(Schema { fields })
    }

    /// Top-level fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Runs one read pass: every field in declaration order against one
    /// shared cursor and one accumulating [DataSet]. No field starts before
    /// all fields declared ahead of it have finished, so back-references only
    /// ever see strictly earlier values. The first error aborts the pass.
    pub fn read(&self, stream: &mut dyn Stream) -> Result<DataSet, ReadError> {
        let mut data = DataSet::new();

        for field in &self.fields {
            field.read(stream, &mut data)?;
        }

        Ok(data)
    }

    /// Runs one write pass, mirroring [Schema::read]: same order, same
    /// parameter resolution, values taken from the supplied `data`, which is
    /// never mutated.
    pub fn write(&self, stream: &mut dyn Stream, data: &DataSet) -> Result<(), WriteError> {
        for field in &self.fields {
            field.write(stream, data)?;
        }

        Ok(())
    }
}

fn malformed(node: &DefNode, reason: impl Into<String>) -> BuildError {
    BuildError::MalformedDefinition {
        field: node.name.clone(),
        reason: reason.into(),
    }
}

fn build_level(
    registry: &Registry,
    nodes: &[DefNode],
    parent: &FieldPath,
) -> Result<Vec<Field>, BuildError> {
    let mut fields = Vec::with_capacity(nodes.len());
    let mut seen = BTreeSet::new();

    for node in nodes {
        if !seen.insert(node.name.as_str()) {
            return Err(malformed(node, "duplicate field name among siblings"));
        }
        fields.push(build_field(registry, node, parent)?);
    }

    Ok(fields)
}

fn build_field(
    registry: &Registry,
    node: &DefNode,
    parent: &FieldPath,
) -> Result<Field, BuildError> {
    if node.name.is_empty() || node.name.contains(['/', '.']) {
        return Err(malformed(
            node,
            "field names must be non-empty and free of path delimiters",
        ));
    }

    let path = parent.child(&node.name);

    if node.type_tag == COMPOUND_TAG {
        if !node.params.is_empty() {
            return Err(malformed(node, "compound fields take no parameters"));
        }
        if !node.validators.is_empty() {
            return Err(malformed(node, "compound fields hold no value to validate"));
        }

        let children = build_level(registry, &node.children, &path)?;
        return Ok(Field::new(
            node.name.clone(),
            path,
            FieldKind::Compound { children },
        ));
    }

    let codec = registry
        .field(&node.type_tag)
        .ok_or_else(|| BuildError::UnknownFieldType(node.type_tag.clone()))?
        .clone();

    if !node.children.is_empty() {
        return Err(malformed(node, "only compound fields may declare children"));
    }

    for required in codec.required_params() {
        if !node.params.contains_key(*required) {
            return Err(malformed(
                node,
                format!("missing required parameter `{}`", required),
            ));
        }
    }

    let params: BTreeMap<String, ValueRef> = node
        .params
        .iter()
        .map(|(name, raw)| (name.clone(), ValueRef::from_raw(raw)))
        .collect();

    let mut validators = Vec::with_capacity(node.validators.len());
    for spec in &node.validators {
        let built = registry
            .validator(&spec.tag, &spec.arg)
            .ok_or_else(|| malformed(node, format!("unknown validator `{}`", spec.tag)))?
            .map_err(|reason| malformed(node, format!("validator `{}`: {}", spec.tag, reason)))?;
        validators.push(built);
    }

    Ok(Field::new(
        node.name.clone(),
        path,
        FieldKind::Leaf {
            codec,
            params,
            validators,
        },
    ))
}
