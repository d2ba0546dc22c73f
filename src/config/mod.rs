//! Config transform: nested configuration value <-> flat editable fields.
//!
//! Flattening is driven by the resolved `SchemaModel`; reconstruction is
//! seeded from the previous value and coerces edited text leniently.

pub mod describe;
pub mod field;
pub mod flatten;
pub mod path;
pub mod reconstruct;
pub mod session;

pub use describe::field_description;
pub use field::FlatField;
pub use flatten::flatten;
pub use path::FieldPath;
pub use reconstruct::reconstruct;
pub use session::{ConfigDocument, EditSession};
