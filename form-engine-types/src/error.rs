use crate::FieldPath;

/// Error type for schema loading and checking.
///
/// These are development-time problems with a form definition. Problems with
/// the data a user entered are never errors; they are reported through a
/// validation result instead.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The JSON text is not a valid schema.
    #[error("Invalid schema JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Field '{0}' is defined more than once")]
    DuplicateField(FieldPath),

    /// A condition points at a path that no field owns.
    #[error("Field '{field}' depends on '{reference}', which is not a field of this form")]
    UnknownReference {
        field: FieldPath,
        reference: FieldPath,
    },

    #[error("Field '{field}' has min {min} greater than max {max}")]
    InvalidBounds { field: FieldPath, min: i64, max: i64 },

    #[error("Choice field '{0}' has no options")]
    MissingOptions(FieldPath),

    #[error("Field '{field}' lists option '{value}' more than once")]
    DuplicateOption { field: FieldPath, value: String },

    /// Checkbox-group options become record keys, so they cannot contain `.`.
    #[error("Checkbox group '{field}' has option '{value}' containing '.'")]
    DottedOption { field: FieldPath, value: String },
}
