//! The stateful face of the engine: one record being edited against one schema.

use tracing::{debug, info, warn};

use crate::coerce::{RawInput, blank_value, coerce, set_group_member};
use crate::validate::{ValidationConfig, ValidationResult, Validator};
use crate::{FieldKind, FieldPath, FieldValue, FormSchema, Record, condition};

/// Error type for misuse of the editing API.
///
/// These point at a mismatch between the calling UI and the schema; bad
/// user input is reported by validation instead.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("No field named '{0}' in this form")]
    UnknownField(FieldPath),

    #[error("Field '{0}' is a checkbox group; toggle its options instead")]
    GroupField(FieldPath),

    #[error("Field '{0}' is not a checkbox group")]
    NotAGroup(FieldPath),

    #[error("Checkbox group '{field}' has no option '{option}'")]
    UnknownOption { field: FieldPath, option: String },
}

/// Build the starting record for a form.
///
/// Checkboxes start unchecked and checkbox groups start with every option
/// unchecked. `defaults` are then written for paths owned by a field (a field
/// name, or a member of a checkbox group); anything else is skipped. Text
/// defaults for a field are coerced the same way an edit would be.
pub fn create_initial_record<P, V>(
    schema: &FormSchema,
    defaults: impl IntoIterator<Item = (P, V)>,
) -> Record
where
    P: Into<FieldPath>,
    V: Into<FieldValue>,
{
    let mut record = Record::new();
    for field in schema.fields() {
        if is_toggle(field.kind()) {
            record.set(field.name(), blank_value(field.kind()));
        }
    }

    for (path, value) in defaults {
        let path: FieldPath = path.into();
        let value: FieldValue = value.into();
        if let Some(field) = schema.field(&path) {
            let value = match value {
                FieldValue::Text(text) if !is_toggle(field.kind()) => {
                    coerce(field, &RawInput::text(text)).unwrap_or(FieldValue::Empty)
                }
                other => other,
            };
            record.set(&path, value);
        } else if schema.fields().any(|f| f.name().is_ancestor_of(&path)) {
            record.set(&path, value);
        } else {
            warn!(form = %schema.id, path = %path, "ignoring default for a path no field owns");
        }
    }

    record
}

fn is_toggle(kind: &FieldKind) -> bool {
    matches!(kind, FieldKind::Checkbox | FieldKind::CheckboxGroup(_))
}

/// Check whether the named field should currently be shown.
///
/// Unknown names are never applicable.
pub fn is_applicable(schema: &FormSchema, record: &Record, name: impl AsRef<str>) -> bool {
    schema
        .field(name)
        .is_some_and(|field| condition::is_applicable(record, field))
}

/// Coerce `raw` for the named field, store it, and reset dependents.
pub fn handle_field_change(
    schema: &FormSchema,
    record: &mut Record,
    name: impl AsRef<str>,
    raw: &RawInput,
) -> Result<(), FormError> {
    let name = name.as_ref();
    let field = schema
        .field(name)
        .ok_or_else(|| FormError::UnknownField(name.into()))?;
    let value = coerce(field, raw).ok_or_else(|| FormError::GroupField(field.name().clone()))?;

    debug!(field = %field.name(), value = ?value, "field changed");
    record.set(field.name(), value);
    reset_dependents(schema, record, field.name());
    Ok(())
}

/// Toggle one option of the named checkbox group, and reset dependents.
pub fn handle_group_toggle(
    schema: &FormSchema,
    record: &mut Record,
    group: impl AsRef<str>,
    option: &str,
    checked: bool,
) -> Result<(), FormError> {
    let group = group.as_ref();
    let field = schema
        .field(group)
        .ok_or_else(|| FormError::UnknownField(group.into()))?;
    if !field.kind().is_checkbox_group() {
        return Err(FormError::NotAGroup(field.name().clone()));
    }
    if !field.kind().options().iter().any(|o| o.value == option) {
        return Err(FormError::UnknownOption {
            field: field.name().clone(),
            option: option.to_string(),
        });
    }

    set_group_member(record, field.name(), option, checked);
    debug!(field = %field.name(), option, checked, "group member toggled");
    reset_dependents(schema, record, &field.name().child(option));
    Ok(())
}

/// Blank out fields that stopped applying because `changed` was written.
///
/// Resetting a field can in turn make its own dependents inapplicable, so
/// this follows the chain. Each reset leaves the field blank, so a field is
/// reset at most once.
pub fn reset_dependents(schema: &FormSchema, record: &mut Record, changed: &FieldPath) {
    let mut pending = vec![changed.clone()];
    while let Some(path) = pending.pop() {
        for dependent in schema.dependents_of(&path) {
            if condition::is_applicable(record, dependent) {
                continue;
            }
            let blank = blank_value(dependent.kind());
            let needs_reset = record
                .get(dependent.name())
                .is_some_and(|current| !current.is_blank() && *current != blank);
            if !needs_reset {
                continue;
            }

            debug!(field = %dependent.name(), trigger = %path, "resetting field that no longer applies");
            record.set(dependent.name(), blank);
            pending.push(dependent.name().clone());
        }
    }
}

/// An editing session: a schema, the record being filled in, and the
/// validation settings.
///
/// The UI forwards change events here and re-renders from [`FormSession::record`].
#[derive(Debug, Clone)]
pub struct FormSession<'s> {
    schema: &'s FormSchema,
    record: Record,
    validator: Validator,
}

impl<'s> FormSession<'s> {
    /// Start a session with an initial record and no defaults.
    pub fn new(schema: &'s FormSchema) -> Self {
        Self::with_defaults(schema, std::iter::empty::<(FieldPath, FieldValue)>())
    }

    /// Start a session whose record is seeded with `defaults`.
    pub fn with_defaults<P, V>(
        schema: &'s FormSchema,
        defaults: impl IntoIterator<Item = (P, V)>,
    ) -> Self
    where
        P: Into<FieldPath>,
        V: Into<FieldValue>,
    {
        Self {
            schema,
            record: create_initial_record(schema, defaults),
            validator: Validator::default(),
        }
    }

    /// Resume editing an existing record.
    pub fn from_record(schema: &'s FormSchema, record: Record) -> Self {
        Self {
            schema,
            record,
            validator: Validator::default(),
        }
    }

    /// Use a custom validation configuration.
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.validator = Validator::new(config);
        self
    }

    pub fn schema(&self) -> &'s FormSchema {
        self.schema
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    /// Handle a change event for the named field.
    pub fn handle_field_change(
        &mut self,
        name: impl AsRef<str>,
        raw: impl Into<RawInput>,
    ) -> Result<&Record, FormError> {
        handle_field_change(self.schema, &mut self.record, name, &raw.into())?;
        Ok(&self.record)
    }

    /// Handle a toggle of one option of the named checkbox group.
    pub fn handle_group_toggle(
        &mut self,
        group: impl AsRef<str>,
        option: &str,
        checked: bool,
    ) -> Result<&Record, FormError> {
        handle_group_toggle(self.schema, &mut self.record, group, option, checked)?;
        Ok(&self.record)
    }

    /// Validate the current record from scratch.
    pub fn validate(&self) -> ValidationResult {
        self.validator.validate(self.schema, &self.record)
    }

    /// The current error for one field, if any.
    pub fn field_error(&self, name: impl AsRef<str>) -> Option<String> {
        self.validate().get(name).map(str::to_owned)
    }

    pub fn is_applicable(&self, name: impl AsRef<str>) -> bool {
        is_applicable(self.schema, &self.record, name)
    }

    /// Validate and hand out the record if it passes.
    pub fn submit(&self) -> Result<&Record, ValidationResult> {
        let result = self.validate();
        if result.is_empty() {
            info!(form = %self.schema.id, "record accepted");
            Ok(&self.record)
        } else {
            info!(form = %self.schema.id, errors = result.len(), "record rejected");
            Err(result)
        }
    }
}
