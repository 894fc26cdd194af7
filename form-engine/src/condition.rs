//! Decides whether a field currently applies and whether it must be filled in.

use crate::{FieldDef, FieldValue, Record, RequiredIf, RequiredIfAny};

/// Loose comparison of a looked-up value against a condition value.
///
/// A missing value never matches. Present values compare with
/// [`FieldValue::loose_eq`], so the text `"8"` matches the number `8`.
pub fn loose_equals(actual: Option<&FieldValue>, expected: &FieldValue) -> bool {
    actual.is_some_and(|value| value.loose_eq(expected))
}

/// Check whether the field is relevant given the current record.
///
/// Inapplicable fields are not rendered and take no part in validation.
pub fn is_applicable(record: &Record, field: &FieldDef) -> bool {
    chain_filled(record, field) && condition_met(record, field).unwrap_or(true)
}

/// Check whether the field must hold a value given the current record.
///
/// An unconditional `required` flag and a matching conditional rule are
/// combined with OR. A field whose `requires_filled` chain is broken is never
/// required.
pub fn is_required(record: &Record, field: &FieldDef) -> bool {
    chain_filled(record, field)
        && (field.is_required() || condition_met(record, field).unwrap_or(false))
}

/// Outcome of the field's conditional rules, `None` when it has none.
///
/// A field carrying both rules matches when either does.
fn condition_met(record: &Record, field: &FieldDef) -> Option<bool> {
    let by_value = field.required_if_rule().map(|rule| required_if(record, rule));
    let by_any = field
        .required_if_any_rule()
        .map(|rule| required_if_any(record, rule));

    match (by_value, by_any) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(false) || b.unwrap_or(false)),
    }
}

fn required_if(record: &Record, rule: &RequiredIf) -> bool {
    loose_equals(record.get(&rule.field), &rule.equals)
}

/// Membership here is exact: `"1"` is not in `[1]`.
fn required_if_any(record: &Record, rule: &RequiredIfAny) -> bool {
    rule.fields
        .iter()
        .filter_map(|path| record.get(path))
        .any(|value| rule.values.contains(value))
}

fn chain_filled(record: &Record, field: &FieldDef) -> bool {
    field
        .requires_filled_paths()
        .iter()
        .all(|path| record.has_value(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldKind;

    fn other_place() -> FieldDef {
        FieldDef::new("lugareaotro", "Otro lugar", FieldKind::text()).required_if("lugarea", "8")
    }

    fn record_with(path: &str, value: impl Into<FieldValue>) -> Record {
        let mut record = Record::new();
        record.set(path, value);
        record
    }

    #[test]
    fn unconditional_fields() {
        let record = Record::new();
        let optional = FieldDef::new("obs", "Observaciones", FieldKind::textarea());
        let required = optional.clone().required();

        assert!(is_applicable(&record, &optional));
        assert!(!is_required(&record, &optional));
        assert!(is_applicable(&record, &required));
        assert!(is_required(&record, &required));
    }

    #[test]
    fn required_if_is_symmetric() {
        let field = other_place();
        let samples = [
            (FieldValue::from("8"), true),
            (FieldValue::Int(8), true),
            (FieldValue::from("9"), false),
            (FieldValue::from(""), false),
            (FieldValue::Empty, false),
        ];
        for (value, expected) in samples {
            let record = record_with("lugarea", value.clone());
            assert_eq!(is_required(&record, &field), expected, "{value:?}");
            assert_eq!(is_applicable(&record, &field), expected, "{value:?}");
        }

        let empty = Record::new();
        assert!(!is_required(&empty, &field));
        assert!(!is_applicable(&empty, &field));
    }

    #[test]
    fn required_if_matches_checkbox_state() {
        let field = FieldDef::new("otro_cual", "Cuál", FieldKind::text())
            .required_if("personal_involucrado.otroea", true);

        let checked = record_with("personal_involucrado.otroea", true);
        let unchecked = record_with("personal_involucrado.otroea", false);
        assert!(is_required(&checked, &field));
        assert!(!is_required(&unchecked, &field));
    }

    #[test]
    fn required_if_any_uses_exact_membership() {
        let field = FieldDef::new("dano", "Daño", FieldKind::text())
            .required_if_any(["clasificacion", "severidad"], ["3", "4"]);

        assert!(is_required(&record_with("severidad", "4"), &field));
        assert!(!is_required(&record_with("severidad", "2"), &field));
        assert!(!is_required(&record_with("severidad", 4), &field));
        assert!(!is_required(&Record::new(), &field));
    }

    #[test]
    fn required_flag_ors_with_condition() {
        let field = other_place().required();
        let unmatched = record_with("lugarea", "2");

        assert!(is_required(&unmatched, &field));
        assert!(!is_applicable(&unmatched, &field));
    }

    #[test]
    fn either_rule_can_match() {
        let field = FieldDef::new("x", "X", FieldKind::text())
            .required_if("a", "1")
            .required_if_any(["b"], ["2"]);

        assert!(is_required(&record_with("a", "1"), &field));
        assert!(is_required(&record_with("b", "2"), &field));
        assert!(!is_required(&record_with("a", "2"), &field));
    }

    #[test]
    fn requires_filled_chains_on_ancestors() {
        let room = FieldDef::new("habitacion", "Habitación", FieldKind::text())
            .required_if("lugarea", "8")
            .requires_filled("areaHospitalizacion");

        let mut record = record_with("lugarea", "8");
        assert!(!is_applicable(&record, &room));
        assert!(!is_required(&record, &room));

        record.set("areaHospitalizacion", "");
        assert!(!is_applicable(&record, &room));

        record.set("areaHospitalizacion", "medicina_interna");
        assert!(is_applicable(&record, &room));
        assert!(is_required(&record, &room));

        record.set("lugarea", "2");
        assert!(!is_applicable(&record, &room));
    }

    #[test]
    fn loose_equals_misses_absent_values() {
        assert!(!loose_equals(None, &FieldValue::from("")));
        assert!(loose_equals(Some(&FieldValue::Int(19)), &FieldValue::from("19")));
    }
}
