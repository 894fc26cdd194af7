use serde::{Deserialize, Serialize};

use crate::Record;

/// A single value stored in a `Record`.
///
/// Leaf values are text, integers, booleans or the explicit `Empty` marker.
/// Nested maps hold grouped values such as checkbox-group members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No usable value (e.g. a number input whose text did not parse).
    /// Serialized as `null`.
    Empty,

    /// A boolean value (checkboxes, checkbox-group members).
    Bool(bool),

    /// An integer value (number inputs).
    Int(i64),

    /// A string value (text, textarea, select, radio and date inputs).
    Text(String),

    /// A nested map.
    Map(Record),
}

impl FieldValue {
    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as a nested map.
    pub fn as_map(&self) -> Option<&Record> {
        match self {
            Self::Map(record) => Some(record),
            _ => None,
        }
    }

    /// Check whether this value counts as "not filled in".
    ///
    /// Empty text and `Empty` are blank. A map is blank when none of its
    /// members is filled in, where a `false` member counts as unselected.
    /// A leaf `false` is a real answer and is not blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Int(_) | Self::Bool(_) => false,
            Self::Map(record) => record
                .values()
                .all(|v| matches!(v, Self::Bool(false)) || v.is_blank()),
        }
    }

    /// Permissive equality between values of possibly different types.
    ///
    /// - text against text compares exactly;
    /// - text, integers and booleans otherwise compare as numbers, with
    ///   booleans as `1`/`0` and blank text as `0` (`"8"` equals `8`,
    ///   `true` equals `1` but not `"true"`);
    /// - `Empty` only equals `Empty`;
    /// - maps never loosely equal anything.
    pub fn loose_eq(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Empty, Self::Empty) => true,
            (Self::Empty, _) | (_, Self::Empty) => false,
            (Self::Map(_), _) | (_, Self::Map(_)) => false,
            (a, b) => match (a.to_number(), b.to_number()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// Numeric reading of a primitive, used by `loose_eq`.
    fn to_number(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
                }
            }
            Self::Empty | Self::Map(_) => None,
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Text(_) => "Text",
            Self::Map(_) => "Map",
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Record> for FieldValue {
    fn from(record: Record) -> Self {
        Self::Map(record)
    }
}
