use std::fmt;

use serde::{Deserialize, Serialize};

/// A path to a value inside a record, e.g., `"personal_involucrado.otroea"`.
///
/// Field names in a schema are paths. Paths are hierarchical, using dot
/// notation for nested maps such as checkbox-group members.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath {
    /// Dot-separated path string, e.g., "factores_incidente.facinc3"
    path: String,
}

impl FieldPath {
    /// Create a new path from a dot-separated string.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Append a child segment to this path, returning a new path.
    pub fn child(&self, name: &str) -> Self {
        if name.is_empty() {
            self.clone()
        } else if self.path.is_empty() {
            Self::new(name)
        } else {
            Self::new(format!("{}.{}", self.path, name))
        }
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Get the segments of this path as an iterator.
    ///
    /// Empty segments (from `"a..b"` or a trailing dot) are skipped.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.').filter(|s| !s.is_empty())
    }

    /// Check whether `self` is a strict ancestor of `other`
    /// (`"a"` is an ancestor of `"a.b"`, but not of `"ab"`).
    pub fn is_ancestor_of(&self, other: &FieldPath) -> bool {
        !self.path.is_empty()
            && other.path.len() > self.path.len()
            && other.path.starts_with(&self.path)
            && other.path[self.path.len()..].starts_with('.')
    }

    /// Check whether two paths address the same value or one contains the other.
    pub fn overlaps(&self, other: &FieldPath) -> bool {
        self == other || self.is_ancestor_of(other) || other.is_ancestor_of(self)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for FieldPath {
    fn from(s: &String) -> Self {
        Self::new(s.clone())
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(p: &FieldPath) -> Self {
        p.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child() {
        let path = FieldPath::new("personal_involucrado").child("otroea");
        assert_eq!(path.as_str(), "personal_involucrado.otroea");
    }

    #[test]
    fn segments_skip_empty() {
        let path = FieldPath::new("a..b.");
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments, vec!["a", "b"]);
    }

    #[test]
    fn ancestry() {
        let group = FieldPath::new("factores_incidente");
        let member = FieldPath::new("factores_incidente.facinc3");
        let lookalike = FieldPath::new("factores_incidentes");

        assert!(group.is_ancestor_of(&member));
        assert!(!member.is_ancestor_of(&group));
        assert!(!group.is_ancestor_of(&lookalike));
        assert!(!group.is_ancestor_of(&group));

        assert!(group.overlaps(&member));
        assert!(member.overlaps(&group));
        assert!(group.overlaps(&group));
        assert!(!group.overlaps(&lookalike));
    }

    #[test]
    fn display() {
        let path = FieldPath::new("personal_involucrado.otroea");
        assert_eq!(format!("{}", path), "personal_involucrado.otroea");
    }

    #[test]
    fn serializes_as_plain_string() {
        let path = FieldPath::new("lugarea");
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"lugarea\"");
    }
}
