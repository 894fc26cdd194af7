//! Replays a short editing session on the adverse-event form and prints the
//! validation result after each step.
//!
//! Run with `RUST_LOG=form_engine=debug` to see field resets.

use example_forms::adverse_event;
use form_engine::{FormSession, RawInput};

fn main() -> anyhow::Result<()> {
    form_engine::init_tracing();

    let schema = adverse_event();
    schema.check()?;
    let mut session = FormSession::new(&schema);

    let edits: [(&str, RawInput); 5] = [
        ("lugarea", "8".into()),
        ("areaHospitalizacion", "cirugia".into()),
        ("habitacion", "b-12".into()),
        ("edad", "150".into()),
        ("lugarea", "1".into()),
    ];

    for (field, raw) in edits {
        session.handle_field_change(field, raw.clone())?;
        println!("{field} <- {:?}", raw.value);
        println!("{}", serde_json::to_string_pretty(&session.validate())?);
    }

    session.handle_group_toggle("factores_incidente", "facinc3", true)?;

    match session.submit() {
        Ok(record) => println!("accepted:\n{}", serde_json::to_string_pretty(record)?),
        Err(errors) => println!("{} field(s) still need attention", errors.len()),
    }

    Ok(())
}
