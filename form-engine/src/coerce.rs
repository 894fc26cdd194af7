//! Turning raw UI input into typed record values.

use crate::{FieldDef, FieldKind, FieldValue, Record};

/// What an input widget reports on change: its text and its checked flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    pub value: String,
    pub checked: bool,
}

impl RawInput {
    /// Input from a text-like widget.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            checked: false,
        }
    }

    /// Input from a checkbox.
    pub fn checked(checked: bool) -> Self {
        Self {
            value: String::new(),
            checked,
        }
    }
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<bool> for RawInput {
    fn from(checked: bool) -> Self {
        Self::checked(checked)
    }
}

/// Convert raw input into the value stored for `field`.
///
/// Returns `None` for checkbox groups, which are written one member at a
/// time with [`set_group_member`].
pub fn coerce(field: &FieldDef, raw: &RawInput) -> Option<FieldValue> {
    let value = match field.kind() {
        FieldKind::Number(_) => raw
            .value
            .trim()
            .parse::<i64>()
            .map_or(FieldValue::Empty, FieldValue::Int),
        FieldKind::Checkbox => FieldValue::Bool(raw.checked),
        FieldKind::Text(text) | FieldKind::Textarea(text) => match text.transform {
            Some(transform) => FieldValue::Text(transform.apply(&raw.value)),
            None => FieldValue::Text(raw.value.clone()),
        },
        FieldKind::Select(_) | FieldKind::Radio(_) | FieldKind::Date => {
            FieldValue::Text(raw.value.clone())
        }
        FieldKind::CheckboxGroup(_) => return None,
    };
    Some(value)
}

/// Set one member of the checkbox group at `group`, keeping the others.
///
/// A missing or non-map group value starts out as an empty map.
pub fn set_group_member(record: &mut Record, group: impl AsRef<str>, option: &str, checked: bool) {
    let mut members = record
        .get(group.as_ref())
        .and_then(FieldValue::as_map)
        .cloned()
        .unwrap_or_default();
    members.set(option, checked);
    record.set(group, members);
}

/// The value a field holds when nothing has been entered.
///
/// Checkbox groups get every option set to `false`.
pub fn blank_value(kind: &FieldKind) -> FieldValue {
    match kind {
        FieldKind::Number(_) => FieldValue::Empty,
        FieldKind::Checkbox => FieldValue::Bool(false),
        FieldKind::CheckboxGroup(choice) => FieldValue::Map(
            choice
                .options
                .iter()
                .map(|option| (option.value.clone(), false))
                .collect(),
        ),
        FieldKind::Text(_)
        | FieldKind::Textarea(_)
        | FieldKind::Select(_)
        | FieldKind::Radio(_)
        | FieldKind::Date => FieldValue::Text(String::new()),
    }
}
