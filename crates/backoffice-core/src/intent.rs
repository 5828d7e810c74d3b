// ── Intent API ──
//
// Everything a rendering front end can ask a `ResourceManager` to do
// flows through one `Intent` enum. The manager routes each variant to
// the store, the edit session, or the query state.

use std::num::NonZeroUsize;
use std::sync::Arc;

use serde_json::Value;

use crate::model::{Record, RecordId};
use crate::query::SortSpec;
use crate::session::SubmitOutcome;

/// All user actions on one collection screen.
#[derive(Debug, Clone)]
pub enum Intent {
    // ── Collection ───────────────────────────────────────────────────
    Load,
    Add(Record),
    Replace {
        id: RecordId,
        patch: Record,
    },
    Remove {
        id: RecordId,
    },

    // ── Edit session ─────────────────────────────────────────────────
    OpenForCreate,
    /// Open the form on a loaded record.
    OpenForEdit {
        id: RecordId,
    },
    UpdateField {
        name: String,
        value: Value,
    },
    Submit,
    Cancel,

    // ── Query ────────────────────────────────────────────────────────
    SetFilter(String),
    SetSort(Option<SortSpec>),
    SetPage(NonZeroUsize),
    SetPageSize(NonZeroUsize),
}

/// Result of a dispatched intent.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentResult {
    /// State changed; nothing further to report.
    Ok,
    Loaded { count: usize },
    Saved(Arc<Record>),
    Removed(Arc<Record>),
    Submitted(SubmitOutcome),
}
