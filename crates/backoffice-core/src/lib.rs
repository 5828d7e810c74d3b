// backoffice-core: resource management between backoffice-api and front ends.
//
// - `store`: authoritative local copy of a collection (load/add/replace/remove)
// - `query`: filter → sort → page window over a store snapshot
// - `session`: create/edit form state machine
// - `auth`: session marker check in front of protected screens
// - `manager` / `console`: facades that accept intents and hand out snapshots

pub mod auth;
pub mod backend;
pub mod config;
pub mod console;
pub mod error;
pub mod intent;
pub mod manager;
pub mod model;
pub mod query;
pub mod session;
pub mod store;
pub mod stream;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{AuthGate, GateDecision, MemorySession, Screen, SessionContext};
pub use backend::CollectionBackend;
pub use config::{ConsoleConfig, TlsVerification};
pub use console::{Console, DashboardSummary};
pub use error::{CoreError, ErrorInfo, ErrorKind, FieldErrors};
pub use intent::{Intent, IntentResult};
pub use manager::{ManagerSnapshot, ResourceManager};
pub use model::{EntitySchema, FieldKind, FieldSpec, Record, RecordId};
pub use query::{QueryState, QueryView, SortDirection, SortSpec};
pub use session::{EditSession, EditSessionState, SessionMode, SessionPhase, SubmitOutcome};
pub use store::{CollectionState, LoadStatus, ResourceStore};
pub use stream::SnapshotStream;
