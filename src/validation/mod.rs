pub mod rules;

pub use rules::{validate_fields, FieldKind, FieldRule};
