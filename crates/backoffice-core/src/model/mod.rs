// ── Domain model ──
//
// Records stay entity-agnostic (`Record` = id + JSON fields). Everything
// the core needs to know about a particular entity lives in its schema.

pub(crate) mod schema;

pub use backoffice_api::{Record, RecordId};
pub use schema::{EntitySchema, FieldKind, FieldSpec};
