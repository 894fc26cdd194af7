//! Whole-record validation against a schema.

use chrono::{Local, Months, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::condition::{is_applicable, is_required};
use crate::{FieldDef, FieldKind, FieldPath, FieldValue, FormSchema, Record};

/// Settings for the validation pass.
///
/// Every setting has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// The field holding the date of the event. It may not lie in the future.
    pub event_date_field: FieldPath,

    /// `chrono` format of stored dates.
    pub date_format: String,

    /// When set, the event date may also not be more than this many months
    /// before today. Disabled unless configured.
    pub past_limit_months: Option<u32>,

    /// Fixed "today"; the local date is used when unset.
    pub today: Option<NaiveDate>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            event_date_field: FieldPath::new("fechaea"),
            date_format: "%Y-%m-%d".to_string(),
            past_limit_months: None,
            today: None,
        }
    }
}

impl ValidationConfig {
    /// Parse a config from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_past_limit_months(mut self, months: u32) -> Self {
        self.past_limit_months = Some(months);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Error messages keyed by field name, in schema order.
///
/// An empty result means the record may be submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    errors: Vec<(FieldPath, String)>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record an error. A field keeps the first message it was given.
    pub fn insert(&mut self, field: impl Into<FieldPath>, message: impl Into<String>) {
        let field = field.into();
        if !self.contains(&field) {
            self.errors.push((field, message.into()));
        }
    }

    /// Get the error message for a field, if it has one.
    pub fn get(&self, field: impl AsRef<str>) -> Option<&str> {
        let field = field.as_ref();
        self.errors
            .iter()
            .find(|(path, _)| path.as_str() == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn contains(&self, field: impl AsRef<str>) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &str)> {
        self.errors.iter().map(|(path, message)| (path, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (path, message) in &self.errors {
            map.serialize_entry(path.as_str(), message)?;
        }
        map.end()
    }
}

impl IntoIterator for ValidationResult {
    type Item = (FieldPath, String);
    type IntoIter = std::vec::IntoIter<(FieldPath, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Validate `record` against `schema` with the default configuration.
pub fn validate(schema: &FormSchema, record: &Record) -> ValidationResult {
    Validator::default().validate(schema, record)
}

/// Runs the per-field checks. Holds configuration only; every call starts fresh.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Check every applicable field of `schema` in order.
    ///
    /// Data problems never fail the call; they all end up in the result.
    pub fn validate(&self, schema: &FormSchema, record: &Record) -> ValidationResult {
        let today = self.config.today();
        let mut result = ValidationResult::new();

        for field in schema.fields() {
            if !is_applicable(record, field) {
                continue;
            }
            let required = is_required(record, field);
            if let Some(message) = self.check_field(field, record.get(field.name()), required, today)
            {
                result.insert(field.name().clone(), message);
            }
        }

        debug!(form = %schema.id, errors = result.len(), "validated record");
        result
    }

    fn check_field(
        &self,
        field: &FieldDef,
        value: Option<&FieldValue>,
        required: bool,
        today: NaiveDate,
    ) -> Option<String> {
        let value = match value {
            Some(value) if !value.is_blank() => value,
            _ => return required.then(|| required_message(field)),
        };

        match field.kind() {
            FieldKind::Number(number) => {
                let Some(n) = value.as_int() else {
                    return Some(format!("{} must be a whole number", field.label()));
                };
                if let Some(min) = number.min
                    && n < min
                {
                    return Some(format!("{} must be at least {min}", field.label()));
                }
                if let Some(max) = number.max
                    && n > max
                {
                    return Some(format!("{} must be at most {max}", field.label()));
                }
                None
            }
            FieldKind::Text(text) | FieldKind::Textarea(text) => {
                let max = text.max_length?;
                let length = value.as_str()?.chars().count();
                (length > max).then(|| {
                    format!(
                        "{} must be at most {max} characters ({length} entered)",
                        field.label()
                    )
                })
            }
            FieldKind::Date if required && field.name() == &self.config.event_date_field => {
                self.check_event_date(field, value, today)
            }
            _ => None,
        }
    }

    fn check_event_date(
        &self,
        field: &FieldDef,
        value: &FieldValue,
        today: NaiveDate,
    ) -> Option<String> {
        let parsed = value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), &self.config.date_format).ok());
        let Some(date) = parsed else {
            return Some(format!("{} is not a valid date", field.label()));
        };

        if date > today {
            return Some(format!("{} cannot be in the future", field.label()));
        }

        if let Some(months) = self.config.past_limit_months
            && let Some(earliest) = today.checked_sub_months(Months::new(months))
            && date < earliest
        {
            return Some(format!(
                "{} cannot be earlier than {}",
                field.label(),
                earliest.format(&self.config.date_format)
            ));
        }

        None
    }
}

fn required_message(field: &FieldDef) -> String {
    match field.kind() {
        FieldKind::CheckboxGroup(_) => "Select at least one option".to_string(),
        _ => format!("{} is required", field.label()),
    }
}
