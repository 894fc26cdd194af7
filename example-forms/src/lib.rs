//! Concrete forms built on `form-engine`.

pub mod adverse_event;

pub use adverse_event::{
    ADVERSE_EVENT_JSON, HOSPITALIZATION, MAX_DESCRIPTION, OTHER_PLACE, adverse_event,
    adverse_event_from_json,
};
