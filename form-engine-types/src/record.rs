use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{FieldPath, FieldValue};

/// Error type for typed record access.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Missing value for path: {0}")]
    MissingPath(FieldPath),

    #[error("Type mismatch at path '{path}': expected {expected}, got {actual}")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        actual: &'static str,
    },
}

/// The data captured by a form.
///
/// Unlike a flat path-keyed map, a record is a real tree: a value written at
/// `a.b` lives in a nested map under key `a`. All access goes through dotted
/// paths. Lookups never fail: a path that runs into a missing key or a
/// non-map value simply yields `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create a new empty record.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Get the value at the given path.
    pub fn get(&self, path: impl AsRef<str>) -> Option<&FieldValue> {
        let path = FieldPath::new(path.as_ref());
        let segments: Vec<&str> = path.segments().collect();
        let (last, parents) = segments.split_last()?;

        let mut current = self;
        for segment in parents {
            match current.values.get(*segment) {
                Some(FieldValue::Map(next)) => current = next,
                _ => return None,
            }
        }
        current.values.get(*last)
    }

    /// Write a value at the given path.
    ///
    /// Every intermediate segment is made into a map, replacing whatever
    /// non-map value was there. Siblings along the way are left untouched.
    /// An empty path is ignored.
    pub fn set(&mut self, path: impl AsRef<str>, value: impl Into<FieldValue>) {
        let path = FieldPath::new(path.as_ref());
        let segments: Vec<&str> = path.segments().collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut current = self;
        for segment in parents {
            let entry = current
                .values
                .entry((*segment).to_string())
                .or_insert_with(|| FieldValue::Map(Record::new()));
            current = ensure_map(entry);
        }
        current.values.insert((*last).to_string(), value.into());
    }

    /// Check if a value exists at the given path.
    pub fn contains(&self, path: impl AsRef<str>) -> bool {
        self.get(path).is_some()
    }

    /// Check if the value at the given path is present and not blank.
    pub fn has_value(&self, path: impl AsRef<str>) -> bool {
        self.get(path).is_some_and(|v| !v.is_blank())
    }

    /// Iterate over the top-level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over the top-level values in key order.
    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.values.values()
    }

    /// Get the number of top-level entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // === Convenience accessors ===

    /// Get a text value at the given path.
    pub fn get_text(&self, path: impl AsRef<str>) -> Result<&str, RecordError> {
        match self.get(path.as_ref()) {
            Some(FieldValue::Text(s)) => Ok(s),
            Some(other) => Err(mismatch(path.as_ref(), "Text", other)),
            None => Err(RecordError::MissingPath(path.as_ref().into())),
        }
    }

    /// Get an integer value at the given path.
    pub fn get_int(&self, path: impl AsRef<str>) -> Result<i64, RecordError> {
        match self.get(path.as_ref()) {
            Some(FieldValue::Int(i)) => Ok(*i),
            Some(other) => Err(mismatch(path.as_ref(), "Int", other)),
            None => Err(RecordError::MissingPath(path.as_ref().into())),
        }
    }

    /// Get a boolean value at the given path.
    pub fn get_bool(&self, path: impl AsRef<str>) -> Result<bool, RecordError> {
        match self.get(path.as_ref()) {
            Some(FieldValue::Bool(b)) => Ok(*b),
            Some(other) => Err(mismatch(path.as_ref(), "Bool", other)),
            None => Err(RecordError::MissingPath(path.as_ref().into())),
        }
    }

    /// Get a nested map at the given path.
    pub fn get_map(&self, path: impl AsRef<str>) -> Result<&Record, RecordError> {
        match self.get(path.as_ref()) {
            Some(FieldValue::Map(record)) => Ok(record),
            Some(other) => Err(mismatch(path.as_ref(), "Map", other)),
            None => Err(RecordError::MissingPath(path.as_ref().into())),
        }
    }
}

fn mismatch(path: &str, expected: &'static str, actual: &FieldValue) -> RecordError {
    RecordError::TypeMismatch {
        path: path.into(),
        expected,
        actual: actual.type_name(),
    }
}

/// Turn `value` into a map if it is not one already and borrow the map.
fn ensure_map(value: &mut FieldValue) -> &mut Record {
    if !matches!(value, FieldValue::Map(_)) {
        *value = FieldValue::Map(Record::new());
    }
    match value {
        FieldValue::Map(record) => record,
        _ => unreachable!("value was just replaced with a map"),
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (path, value) in iter {
            let path: String = path.into();
            record.set(path, value);
        }
        record
    }
}
