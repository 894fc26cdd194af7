use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{FieldDef, FieldKind, FieldPath, SchemaError};

/// The top-level description of a form: metadata plus ordered sections.
///
/// A schema is presentation-agnostic. It is built once (in code or from
/// JSON) and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Sections in display order.
    #[serde(default)]
    pub sections: Vec<FormSection>,
}

/// A named group of fields within a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    pub id: String,

    pub label: String,

    /// Fields in display order.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl FormSection {
    /// Create a new section with the given fields.
    pub fn new(id: impl Into<String>, label: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            fields,
        }
    }

    /// Get the fields.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

impl FormSchema {
    /// Create a schema with no sections.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            sections: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a section.
    pub fn with_section(mut self, section: FormSection) -> Self {
        self.sections.push(section);
        self
    }

    /// Parse a schema from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the schema to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Get the sections.
    pub fn sections(&self) -> &[FormSection] {
        &self.sections
    }

    /// Iterate over every field of every section, in schema order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    /// Look up a field by its exact name.
    pub fn field(&self, name: impl AsRef<str>) -> Option<&FieldDef> {
        let name = name.as_ref();
        self.fields().find(|f| f.name().as_str() == name)
    }

    /// Check if the schema has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }

    /// Get the total number of fields.
    pub fn len(&self) -> usize {
        self.fields().count()
    }

    /// Fields whose applicability reads `path` (directly, or through a
    /// parent/child path such as a checkbox-group member).
    pub fn dependents_of<'a>(&'a self, path: &'a FieldPath) -> impl Iterator<Item = &'a FieldDef> {
        self.fields()
            .filter(move |f| f.dependencies().into_iter().any(|dep| dep.overlaps(path)))
    }

    /// Check the schema for mistakes that would otherwise fail silently at runtime.
    ///
    /// A condition that references a path no field owns never matches, so the
    /// dependent field can never appear. That is harmless to the engine but is
    /// almost always a typo, which is what this catches.
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut names = HashSet::new();
        for field in self.fields() {
            if !names.insert(field.name()) {
                return Err(SchemaError::DuplicateField(field.name().clone()));
            }
        }

        for field in self.fields() {
            for dep in field.dependencies() {
                let known = self
                    .fields()
                    .any(|f| f.name() == dep || f.name().is_ancestor_of(dep));
                if !known {
                    return Err(SchemaError::UnknownReference {
                        field: field.name().clone(),
                        reference: dep.clone(),
                    });
                }
            }

            match field.kind() {
                FieldKind::Number(number) => {
                    if let (Some(min), Some(max)) = (number.min, number.max)
                        && min > max
                    {
                        return Err(SchemaError::InvalidBounds {
                            field: field.name().clone(),
                            min,
                            max,
                        });
                    }
                }
                kind if kind.is_choice() => {
                    if kind.options().is_empty() {
                        return Err(SchemaError::MissingOptions(field.name().clone()));
                    }
                    let mut seen = HashSet::new();
                    for option in kind.options() {
                        if !seen.insert(option.value.as_str()) {
                            return Err(SchemaError::DuplicateOption {
                                field: field.name().clone(),
                                value: option.value.clone(),
                            });
                        }
                        if kind.is_checkbox_group() && option.value.contains('.') {
                            return Err(SchemaError::DottedOption {
                                field: field.name().clone(),
                                value: option.value.clone(),
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldOption, NumberField};

    fn place_schema() -> FormSchema {
        FormSchema::new("lugar", "Lugar").with_section(FormSection::new(
            "s1",
            "Lugar del evento",
            vec![
                FieldDef::new(
                    "lugarea",
                    "Lugar",
                    FieldKind::select(vec![
                        FieldOption::new("2", "Urgencias"),
                        FieldOption::new("19", "Otro"),
                    ]),
                )
                .required(),
                FieldDef::new("lugareaotro", "Otro lugar", FieldKind::text())
                    .required_if("lugarea", "19"),
            ],
        ))
    }

    #[test]
    fn lookup_and_counts() {
        let schema = place_schema();
        assert_eq!(schema.len(), 2);
        assert!(!schema.is_empty());
        assert!(schema.field("lugareaotro").is_some());
        assert!(schema.field("nada").is_none());
    }

    #[test]
    fn dependents() {
        let schema = place_schema();
        let path = FieldPath::new("lugarea");
        let names: Vec<_> = schema
            .dependents_of(&path)
            .map(|f| f.name().as_str())
            .collect();
        assert_eq!(names, vec!["lugareaotro"]);
    }

    #[test]
    fn check_accepts_valid_schema() {
        assert!(place_schema().check().is_ok());
    }

    #[test]
    fn check_rejects_unknown_reference() {
        let schema = FormSchema::new("f", "F").with_section(FormSection::new(
            "s",
            "S",
            vec![FieldDef::new("x", "X", FieldKind::text()).required_if("typo", "1")],
        ));
        assert!(matches!(
            schema.check(),
            Err(SchemaError::UnknownReference { .. })
        ));
    }

    #[test]
    fn check_accepts_group_member_reference() {
        let schema = FormSchema::new("f", "F").with_section(FormSection::new(
            "s",
            "S",
            vec![
                FieldDef::new(
                    "personal",
                    "Personal",
                    FieldKind::checkbox_group(vec![FieldOption::new("otroea", "Otro")]),
                ),
                FieldDef::new("personal_otro", "Cuál", FieldKind::text())
                    .required_if("personal.otroea", true),
            ],
        ));
        assert!(schema.check().is_ok());
    }

    #[test]
    fn check_rejects_bad_definitions() {
        let duplicate = FormSchema::new("f", "F").with_section(FormSection::new(
            "s",
            "S",
            vec![
                FieldDef::new("x", "X", FieldKind::text()),
                FieldDef::new("x", "X again", FieldKind::text()),
            ],
        ));
        assert!(matches!(
            duplicate.check(),
            Err(SchemaError::DuplicateField(_))
        ));

        let bounds = FormSchema::new("f", "F").with_section(FormSection::new(
            "s",
            "S",
            vec![FieldDef::new(
                "edad",
                "Edad",
                FieldKind::Number(NumberField::with_bounds(Some(10), Some(1))),
            )],
        ));
        assert!(matches!(
            bounds.check(),
            Err(SchemaError::InvalidBounds { min: 10, max: 1, .. })
        ));

        let no_options = FormSchema::new("f", "F").with_section(FormSection::new(
            "s",
            "S",
            vec![FieldDef::new("sexo", "Sexo", FieldKind::radio(vec![]))],
        ));
        assert!(matches!(
            no_options.check(),
            Err(SchemaError::MissingOptions(_))
        ));

        let repeated = FormSchema::new("f", "F").with_section(FormSection::new(
            "s",
            "S",
            vec![FieldDef::new(
                "sexo",
                "Sexo",
                FieldKind::radio(vec![FieldOption::new("1", "A"), FieldOption::new("1", "B")]),
            )],
        ));
        assert!(matches!(
            repeated.check(),
            Err(SchemaError::DuplicateOption { .. })
        ));
    }

    #[test]
    fn check_rejects_dotted_group_option() {
        let schema = FormSchema::new("f", "F").with_section(FormSection::new(
            "s",
            "S",
            vec![FieldDef::new(
                "factores",
                "Factores",
                FieldKind::checkbox_group(vec![FieldOption::new("x.y", "Mal nombrado")]),
            )],
        ));
        assert!(matches!(
            schema.check(),
            Err(SchemaError::DottedOption { ref value, .. }) if value == "x.y"
        ));

        let select = FormSchema::new("f", "F").with_section(FormSection::new(
            "s",
            "S",
            vec![FieldDef::new(
                "dosis",
                "Dosis",
                FieldKind::select(vec![FieldOption::new("0.5", "Media")]),
            )],
        ));
        assert!(select.check().is_ok());
    }

    #[test]
    fn json_round_trip() -> anyhow::Result<()> {
        let schema = place_schema();
        schema.check()?;
        let json = schema.to_json()?;
        let back = FormSchema::from_json(&json)?;
        assert_eq!(back, schema);
        Ok(())
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(matches!(
            FormSchema::from_json("{ not json"),
            Err(SchemaError::Parse(_))
        ));
    }
}
