use form_engine::{
    FieldDef, FieldKind, FieldOption, FormSchema, FormSection, NumberField, TextField, Transform,
};

/// The adverse-event schema in its JSON form, as shipped to the UI.
pub const ADVERSE_EVENT_JSON: &str = include_str!("../schemas/adverse_event.json");

/// `lugarea` option meaning "somewhere else"; unlocks `lugareaotro`.
pub const OTHER_PLACE: &str = "19";

/// `lugarea` option for hospital wards; unlocks the ward and room fields.
pub const HOSPITALIZATION: &str = "8";

/// Maximum length of the free-text event description.
pub const MAX_DESCRIPTION: usize = 700;

fn options(pairs: &[(&str, &str)]) -> Vec<FieldOption> {
    pairs
        .iter()
        .map(|(value, label)| FieldOption::new(*value, *label))
        .collect()
}

fn upper(max_length: usize) -> TextField {
    TextField::default()
        .with_max_length(max_length)
        .with_transform(Transform::Uppercase)
}

/// When and where the event happened.
///
/// `habitacion` only applies once a ward has been picked, on top of the
/// place being a hospital ward.
fn general_section() -> FormSection {
    FormSection::new(
        "datos_generales",
        "Datos generales del evento",
        vec![
            FieldDef::new("fechaea", "Fecha del evento", FieldKind::Date).required(),
            FieldDef::new(
                "turnoea",
                "Turno",
                FieldKind::radio(options(&[
                    ("1", "Matutino"),
                    ("2", "Vespertino"),
                    ("3", "Nocturno"),
                    ("4", "Jornada acumulada"),
                ])),
            )
            .required(),
            FieldDef::new(
                "lugarea",
                "Lugar donde ocurrió el evento",
                FieldKind::select(options(&[
                    ("1", "Urgencias"),
                    ("2", "Consulta externa"),
                    ("3", "Quirófano"),
                    ("4", "Terapia intensiva"),
                    ("5", "Laboratorio"),
                    ("6", "Imagenología"),
                    ("7", "Farmacia"),
                    (HOSPITALIZATION, "Hospitalización"),
                    (OTHER_PLACE, "Otro"),
                ])),
            )
            .required(),
            FieldDef::new(
                "lugareaotro",
                "Especifique otro lugar",
                FieldKind::Text(upper(100)),
            )
            .required_if("lugarea", OTHER_PLACE),
            FieldDef::new(
                "areaHospitalizacion",
                "Área de hospitalización",
                FieldKind::select(options(&[
                    ("medicina_interna", "Medicina interna"),
                    ("cirugia", "Cirugía general"),
                    ("pediatria", "Pediatría"),
                    ("ginecologia", "Ginecología y obstetricia"),
                ])),
            )
            .required_if("lugarea", HOSPITALIZATION),
            FieldDef::new("habitacion", "Número de habitación", FieldKind::Text(upper(10)))
                .required_if("lugarea", HOSPITALIZATION)
                .requires_filled("areaHospitalizacion"),
        ],
    )
}

fn patient_section() -> FormSection {
    FormSection::new(
        "paciente",
        "Datos del paciente",
        vec![
            FieldDef::new("expediente", "Número de expediente", FieldKind::Text(upper(20)))
                .required(),
            FieldDef::new(
                "edad",
                "Edad",
                FieldKind::Number(NumberField::with_bounds(Some(0), Some(120))),
            )
            .required(),
            FieldDef::new(
                "sexo",
                "Sexo",
                FieldKind::radio(options(&[("M", "Masculino"), ("F", "Femenino")])),
            )
            .required(),
        ],
    )
}

fn description_section() -> FormSection {
    FormSection::new(
        "descripcion",
        "Descripción del evento",
        vec![
            FieldDef::new(
                "tipoea",
                "Tipo de evento",
                FieldKind::select(options(&[
                    ("1", "Caída"),
                    ("2", "Error de medicación"),
                    ("3", "Infección asociada a la atención"),
                    ("4", "Úlcera por presión"),
                    ("5", "Otro"),
                ])),
            )
            .required(),
            FieldDef::new(
                "severidad",
                "Severidad",
                FieldKind::radio(options(&[
                    ("1", "Sin daño"),
                    ("2", "Leve"),
                    ("3", "Moderado"),
                    ("4", "Grave"),
                    ("5", "Muerte"),
                ])),
            )
            .required(),
            FieldDef::new(
                "dano_descripcion",
                "Describa el daño",
                FieldKind::Textarea(TextField::default().with_max_length(500)),
            )
            .required_if_any(["severidad"], ["3", "4", "5"]),
            FieldDef::new(
                "descripcionea",
                "Descripción del evento",
                FieldKind::Textarea(upper(MAX_DESCRIPTION)),
            )
            .required(),
            FieldDef::new(
                "factores_incidente",
                "Factores que contribuyeron",
                FieldKind::checkbox_group(options(&[
                    ("facinc1", "Paciente"),
                    ("facinc2", "Tarea y tecnología"),
                    ("facinc3", "Individuo"),
                    ("facinc4", "Equipo de trabajo"),
                    ("facinc5", "Ambiente"),
                    ("facinc6", "Organización"),
                    ("facinc7", "Contexto institucional"),
                    ("facinc8", "Otro"),
                ])),
            )
            .required(),
            FieldDef::new(
                "factores_otro",
                "Especifique otro factor",
                FieldKind::Text(upper(100)),
            )
            .required_if("factores_incidente.facinc8", true),
        ],
    )
}

fn staff_section() -> FormSection {
    FormSection::new(
        "personal",
        "Personal involucrado",
        vec![
            FieldDef::new(
                "personal_involucrado",
                "Personal involucrado",
                FieldKind::checkbox_group(options(&[
                    ("medico", "Médico"),
                    ("enfermeria", "Enfermería"),
                    ("tecnico", "Técnico"),
                    ("otroea", "Otro"),
                ])),
            ),
            FieldDef::new(
                "personal_otro",
                "Especifique otro personal",
                FieldKind::Text(upper(100)),
            )
            .required_if("personal_involucrado.otroea", true),
            FieldDef::new(
                "paciente_informado",
                "Se informó al paciente o familiar",
                FieldKind::Checkbox,
            ),
            FieldDef::new(
                "acciones",
                "Acciones inmediatas",
                FieldKind::Textarea(TextField::default().with_max_length(MAX_DESCRIPTION)),
            ),
        ],
    )
}

/// The adverse-event report form.
pub fn adverse_event() -> FormSchema {
    FormSchema::new("evento_adverso", "Registro de evento adverso")
        .with_description("Notificación de eventos adversos para el programa de calidad hospitalaria")
        .with_section(general_section())
        .with_section(patient_section())
        .with_section(description_section())
        .with_section(staff_section())
}

/// Parse the shipped JSON schema.
pub fn adverse_event_from_json() -> anyhow::Result<FormSchema> {
    let schema = FormSchema::from_json(ADVERSE_EVENT_JSON)?;
    schema.check()?;
    Ok(schema)
}
