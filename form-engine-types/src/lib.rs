//! Core types for the form-engine crate.
//!
//! This crate provides the foundational types for describing forms and the
//! data they capture:
//! - `FormSchema`, `FormSection` and `FieldDef` - The declarative form structure
//! - `FieldKind` - The input type of a field and its settings
//! - `Record`, `FieldValue` and `FieldPath` - Captured data and path-based access
//! - `SchemaError` - Problems found while loading or checking a schema

mod field_path;
pub use field_path::FieldPath;

mod field_value;
pub use field_value::FieldValue;

mod record;
pub use record::{Record, RecordError};

mod field;
pub use field::{
    ChoiceField, FieldDef, FieldKind, FieldOption, NumberField, RequiredIf, RequiredIfAny,
    TextField, Transform,
};

mod schema;
pub use schema::{FormSchema, FormSection};

mod error;
pub use error::SchemaError;
