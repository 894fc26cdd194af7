//! # form-engine
//!
//! Schema-driven forms. Presentation-agnostic.
//!
//! A [`FormSchema`] declares sections and fields: their kind, label, numeric
//! or length limits, and the conditions under which they apply. This crate
//! takes care of everything between the UI and the captured [`Record`]:
//!
//! - [`condition`] - whether a field applies and whether it is required
//! - [`coerce`] - turning raw widget input into typed values
//! - [`validate`](mod@validate) - checking a whole record, producing a [`ValidationResult`]
//! - [`FormSession`] - owning the record and wiring edits through the above
//!
//! ## Usage
//!
//! ```rust
//! use form_engine::{FieldDef, FieldKind, FieldOption, FormSchema, FormSection, FormSession};
//!
//! let schema = FormSchema::new("evento", "Evento adverso").with_section(FormSection::new(
//!     "lugar",
//!     "Lugar",
//!     vec![
//!         FieldDef::new(
//!             "lugarea",
//!             "Lugar del evento",
//!             FieldKind::select(vec![
//!                 FieldOption::new("2", "Urgencias"),
//!                 FieldOption::new("19", "Otro"),
//!             ]),
//!         )
//!         .required(),
//!         FieldDef::new("lugareaotro", "Otro lugar", FieldKind::text())
//!             .required_if("lugarea", "19"),
//!     ],
//! ));
//!
//! let mut session = FormSession::new(&schema);
//! session.handle_field_change("lugarea", "19").unwrap();
//! assert!(session.is_applicable("lugareaotro"));
//! assert_eq!(
//!     session.validate().get("lugareaotro"),
//!     Some("Otro lugar is required")
//! );
//! ```
//!
//! ## Logging
//!
//! The engine emits `tracing` events (edits and resets at `debug`, submit
//! outcomes at `info`). Call [`init_tracing`] to install a formatting
//! subscriber controlled by `RUST_LOG`.

use std::sync::Once;

// Re-export all types from form-engine-types
pub use form_engine_types::*;

pub mod condition;
pub use condition::loose_equals;

pub mod coerce;
pub use coerce::{RawInput, blank_value, set_group_member};

pub mod validate;
pub use validate::{ValidationConfig, ValidationResult, Validator, validate};

mod session;
pub use session::{
    FormError, FormSession, create_initial_record, handle_field_change, handle_group_toggle,
    is_applicable, reset_dependents,
};

static INIT_TRACING: Once = Once::new();

/// Install a global `tracing` subscriber, once.
///
/// Filtering follows `RUST_LOG`, falling back to `form_engine=info`. Does
/// nothing if another subscriber is already installed.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("form_engine=info"));
        if fmt().with_env_filter(filter).try_init().is_ok() {
            tracing::info!("form-engine tracing initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_tracing_is_idempotent() {
        super::init_tracing();
        super::init_tracing();
    }
}
