use serde::{Deserialize, Serialize};

use crate::{FieldPath, FieldValue};

/// A single input in a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Where this field's value lives in the record.
    name: FieldPath,

    /// The kind of input, serialized as the `type` tag plus its settings.
    #[serde(flatten)]
    kind: FieldKind,

    /// Display text, also used in error messages.
    label: String,

    /// Unconditionally required.
    #[serde(default, skip_serializing_if = "is_false")]
    required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    required_if: Option<RequiredIf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    required_if_any: Option<RequiredIfAny>,

    /// Paths that must all be filled in before this field applies at all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    requires_filled: Vec<FieldPath>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl FieldDef {
    /// Create a new optional, unconditional field.
    pub fn new(name: impl Into<FieldPath>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: label.into(),
            required: false,
            required_if: None,
            required_if_any: None,
            requires_filled: Vec::new(),
        }
    }

    /// Mark the field as always required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Make the field apply (and be required) only while `field` loosely equals `equals`.
    pub fn required_if(mut self, field: impl Into<FieldPath>, equals: impl Into<FieldValue>) -> Self {
        self.required_if = Some(RequiredIf {
            field: field.into(),
            equals: equals.into(),
        });
        self
    }

    /// Make the field apply (and be required) while any of `fields` holds one of `values`.
    pub fn required_if_any<P, V>(
        mut self,
        fields: impl IntoIterator<Item = P>,
        values: impl IntoIterator<Item = V>,
    ) -> Self
    where
        P: Into<FieldPath>,
        V: Into<FieldValue>,
    {
        self.required_if_any = Some(RequiredIfAny {
            fields: fields.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Additionally require `path` to be filled in for this field to apply.
    pub fn requires_filled(mut self, path: impl Into<FieldPath>) -> Self {
        self.requires_filled.push(path.into());
        self
    }

    /// Get the path of this field.
    pub fn name(&self) -> &FieldPath {
        &self.name
    }

    /// Get the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the field kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether the field is unconditionally required.
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn required_if_rule(&self) -> Option<&RequiredIf> {
        self.required_if.as_ref()
    }

    pub fn required_if_any_rule(&self) -> Option<&RequiredIfAny> {
        self.required_if_any.as_ref()
    }

    pub fn requires_filled_paths(&self) -> &[FieldPath] {
        &self.requires_filled
    }

    /// All paths whose values decide whether this field applies.
    pub fn dependencies(&self) -> Vec<&FieldPath> {
        let mut deps = Vec::new();
        if let Some(rule) = &self.required_if {
            deps.push(&rule.field);
        }
        if let Some(rule) = &self.required_if_any {
            deps.extend(rule.fields.iter());
        }
        deps.extend(self.requires_filled.iter());
        deps
    }
}

/// `{ "field": path, "equals": value }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredIf {
    pub field: FieldPath,
    pub equals: FieldValue,
}

/// `{ "fields": [path, ...], "in": [value, ...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredIfAny {
    pub fields: Vec<FieldPath>,
    #[serde(rename = "in")]
    pub values: Vec<FieldValue>,
}

/// The kind of field, determining how input is coerced and validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldKind {
    /// Single-line text input.
    Text(TextField),

    /// Integer input with optional min/max bounds.
    Number(NumberField),

    /// Multi-line text input.
    Textarea(TextField),

    /// Drop-down with a single choice.
    Select(ChoiceField),

    /// Calendar date, stored as `YYYY-MM-DD` text.
    Date,

    /// A single yes/no toggle.
    Checkbox,

    /// Radio buttons with a single choice.
    Radio(ChoiceField),

    /// Several independent toggles stored as a map of option value to bool.
    CheckboxGroup(ChoiceField),
}

impl FieldKind {
    pub fn text() -> Self {
        Self::Text(TextField::default())
    }

    pub fn textarea() -> Self {
        Self::Textarea(TextField::default())
    }

    pub fn number() -> Self {
        Self::Number(NumberField::default())
    }

    pub fn select(options: Vec<FieldOption>) -> Self {
        Self::Select(ChoiceField::new(options))
    }

    pub fn radio(options: Vec<FieldOption>) -> Self {
        Self::Radio(ChoiceField::new(options))
    }

    pub fn checkbox_group(options: Vec<FieldOption>) -> Self {
        Self::CheckboxGroup(ChoiceField::new(options))
    }

    /// The `type` tag used in the JSON schema.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(_) => "number",
            Self::Textarea(_) => "textarea",
            Self::Select(_) => "select",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
            Self::Radio(_) => "radio",
            Self::CheckboxGroup(_) => "checkbox-group",
        }
    }

    /// Options for choice kinds; empty for everything else.
    pub fn options(&self) -> &[FieldOption] {
        match self {
            Self::Select(choice) | Self::Radio(choice) | Self::CheckboxGroup(choice) => {
                &choice.options
            }
            _ => &[],
        }
    }

    /// Check if this is a kind that picks from a list of options.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Select(_) | Self::Radio(_) | Self::CheckboxGroup(_))
    }

    pub fn is_checkbox_group(&self) -> bool {
        matches!(self, Self::CheckboxGroup(_))
    }
}

/// Settings for `text` and `textarea` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    /// Maximum number of characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Transformation applied to the text as it is entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl TextField {
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Settings for `number` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl NumberField {
    /// Create with bounds.
    pub fn with_bounds(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }
}

/// Settings for `select`, `radio` and `checkbox-group` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceField {
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

impl ChoiceField {
    pub fn new(options: Vec<FieldOption>) -> Self {
        Self { options }
    }
}

/// One entry of a choice field: the stored value and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Text transformation applied when a value is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    Uppercase,
}

impl Transform {
    pub fn apply(&self, input: &str) -> String {
        match self {
            Self::Uppercase => input.to_uppercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_rules() {
        let field = FieldDef::new("lugareaotro", "Otro lugar", FieldKind::text())
            .required_if("lugarea", "19");

        assert_eq!(field.name().as_str(), "lugareaotro");
        assert!(!field.is_required());
        assert_eq!(field.dependencies(), vec![&FieldPath::new("lugarea")]);
        let rule = field.required_if_rule().unwrap();
        assert_eq!(rule.field.as_str(), "lugarea");
        assert_eq!(rule.equals, FieldValue::from("19"));
    }

    #[test]
    fn dependencies_cover_every_rule() {
        let field = FieldDef::new("habitacion", "Habitación", FieldKind::text())
            .required_if("lugarea", "8")
            .required_if_any(["turno"], ["noche"])
            .requires_filled("areaHospitalizacion");

        let deps: Vec<&str> = field
            .dependencies()
            .into_iter()
            .map(FieldPath::as_str)
            .collect();
        assert_eq!(deps, vec!["lugarea", "turno", "areaHospitalizacion"]);
    }

    #[test]
    fn kind_json_shape() {
        let field = FieldDef::new(
            "descripcionea",
            "Descripción",
            FieldKind::Textarea(
                TextField::default()
                    .with_max_length(700)
                    .with_transform(Transform::Uppercase),
            ),
        )
        .required();

        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "descripcionea",
                "type": "textarea",
                "label": "Descripción",
                "required": true,
                "maxLength": 700,
                "transform": "uppercase",
            })
        );
    }

    #[test]
    fn parses_unit_kinds_and_conditions() {
        let field: FieldDef = serde_json::from_value(serde_json::json!({
            "name": "fechaea",
            "type": "date",
            "label": "Fecha del evento",
            "requiredIfAny": { "fields": ["tipo"], "in": ["1", 2, true] },
        }))
        .unwrap();

        assert_eq!(field.kind(), &FieldKind::Date);
        let rule = field.required_if_any_rule().unwrap();
        assert_eq!(
            rule.values,
            vec![
                FieldValue::from("1"),
                FieldValue::Int(2),
                FieldValue::Bool(true)
            ]
        );
    }

    #[test]
    fn options_only_for_choice_kinds() {
        let group = FieldKind::checkbox_group(vec![FieldOption::new("facinc1", "Paciente")]);
        assert!(group.is_choice());
        assert_eq!(group.options().len(), 1);
        assert_eq!(group.type_name(), "checkbox-group");

        assert!(FieldKind::Checkbox.options().is_empty());
        assert!(!FieldKind::number().is_choice());
    }

    #[test]
    fn uppercase_transform() {
        assert_eq!(Transform::Uppercase.apply("caída de cama"), "CAÍDA DE CAMA");
    }
}
