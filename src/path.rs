//! Hierarchical field paths, root to leaf, used to key values in a
//! [crate::dataset::DataSet].

use std::fmt;

/// Absolute path of a field within the schema tree.
///
/// Names are only unique among siblings; the full path is globally unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// The empty path, parent of all top-level fields.
    pub fn root() -> Self {
        FieldPath {
            segments: Vec::new(),
        }
    }

    /// Parses a `/`- or `.`-delimited path string. Empty segments are dropped.
    pub fn parse(raw: &str) -> Self {
        FieldPath {
            segments: raw
                .split(['/', '.'])
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Path of the child named `name` under this path.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        FieldPath { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        FieldPath::parse(raw)
    }
}
