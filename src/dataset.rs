//! DataSet: ordered, hierarchical, write-once container for one pass's values.

use std::collections::HashMap;

use crate::path::FieldPath;
use crate::value::Value;

/// Error returned by [DataSet::insert] when the path already holds a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey(pub FieldPath);

/// Values of one pass, keyed by full field path, in traversal order.
///
/// Keys are write-once within a pass: a second insert under the same path
/// fails whether or not the values are equal. Lookups only see what has been
/// inserted so far, which is what gives back-references their
/// strictly-earlier ordering guarantee during a read pass.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    entries: Vec<(FieldPath, Value)>,
    index: HashMap<FieldPath, usize>,
}

impl DataSet {
    pub fn new() -> Self {
        DataSet::default()
    }

    /// Inserts `value` under `path`. Fails if the path is already populated.
    pub fn insert(&mut self, path: FieldPath, value: Value) -> Result<(), DuplicateKey> {
        if self.index.contains_key(&path) {
            return Err(DuplicateKey(path));
        }

        self.index.insert(path.clone(), self.entries.len());
        self.entries.push((path, value));

        Ok(())
    }

    /// Value under `path`, if populated.
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        self.index.get(path).map(|&i| &self.entries[i].1)
    }

    /// Convenience lookup by `/`- or `.`-delimited path string.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        self.get(&FieldPath::parse(path))
    }

    /// Entries in insertion (traversal) order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &Value)> {
        self.entries.iter().map(|(path, value)| (path, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Equal when the same paths hold the same values in the same order.
impl PartialEq for DataSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}
