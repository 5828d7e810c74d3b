// ── Edit session ──
//
// Finite-state controller for one create-or-edit form:
//
//   Closed → Open(Create | Edit) → Submitting → Closed
//                    ↑                  │
//                    └──── failure ─────┘
//
// The `Open → Submitting` step happens synchronously inside the watch
// channel before any await, so a second `submit` arriving while the
// first is in flight sees `Submitting` and does nothing.

use std::sync::Arc;

use serde_json::Value;
use strum::Display;
use tokio::sync::watch;
use tracing::debug;

use crate::backend::CollectionBackend;
use crate::error::{CoreError, ErrorInfo, FieldErrors};
use crate::model::{EntitySchema, Record, RecordId};
use crate::store::ResourceStore;
use crate::stream::SnapshotStream;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionMode {
    #[default]
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionPhase {
    #[default]
    Closed,
    Open,
    Submitting,
}

/// Published state of an edit session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSessionState {
    pub phase: SessionPhase,
    /// Meaningful only while not `Closed`.
    pub mode: SessionMode,
    pub target_id: Option<RecordId>,
    pub draft: Record,
    pub field_errors: FieldErrors,
    /// Last submit failure that is not tied to a field.
    pub form_error: Option<ErrorInfo>,
}

impl EditSessionState {
    pub fn is_open(&self) -> bool {
        self.phase == SessionPhase::Open
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SessionPhase::Submitting
    }

    fn describe(&self) -> String {
        match self.phase {
            SessionPhase::Closed => "closed".to_owned(),
            phase => format!("{phase} ({})", self.mode),
        }
    }
}

/// Result of a [`EditSession::submit`] call that did not fail remotely.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The store accepted the record; the session is closed.
    Committed(Arc<Record>),
    /// Local validation failed; errors are on the session state.
    Invalid(FieldErrors),
    /// Not open (already submitting, or closed). Nothing happened.
    Ignored,
}

/// What the synchronous half of `submit` decided.
enum Gate {
    Ignored,
    Invalid(FieldErrors),
    Proceed {
        mode: SessionMode,
        target: Option<RecordId>,
        draft: Record,
    },
}

pub struct EditSession {
    schema: Arc<EntitySchema>,
    state: watch::Sender<Arc<EditSessionState>>,
}

impl EditSession {
    pub fn new(schema: Arc<EntitySchema>) -> Self {
        let (state, _) = watch::channel(Arc::new(EditSessionState::default()));
        Self { schema, state }
    }

    pub fn state(&self) -> Arc<EditSessionState> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> SnapshotStream<EditSessionState> {
        SnapshotStream::new(self.state.subscribe())
    }

    pub fn open_for_create(&self) -> Result<(), CoreError> {
        self.open("open a create form", SessionMode::Create, None, Record::new())
    }

    /// Open with a copy of `record` as the draft. The record must have an id.
    pub fn open_for_edit(&self, record: &Record) -> Result<(), CoreError> {
        let Some(id) = record.id.clone() else {
            return Err(ErrorInfo::validation(format!(
                "cannot edit a {} that has no id",
                self.schema.singular
            ))
            .into());
        };
        self.open("open an edit form", SessionMode::Edit, Some(id), record.without_id())
    }

    /// Set one draft field and clear its error. Only while `Open`.
    pub fn update_field(&self, name: &str, value: impl Into<Value>) -> Result<(), CoreError> {
        let value = value.into();
        self.transition("update a field", |state| {
            if !state.is_open() {
                return false;
            }
            let s = Arc::make_mut(state);
            s.draft.set(name, value);
            s.field_errors.remove(name);
            true
        })
    }

    /// Check the draft against the schema and publish the field errors.
    ///
    /// Returns `true` when the draft is acceptable. Outside `Open` this
    /// only reports; nothing is published.
    pub fn validate(&self) -> bool {
        let mut valid = false;
        self.state.send_if_modified(|state| {
            let errors = self.schema.validate(&state.draft);
            valid = errors.is_empty();
            if !state.is_open() || state.field_errors == errors {
                return false;
            }
            Arc::make_mut(state).field_errors = errors;
            true
        });
        valid
    }

    /// Validate and commit the draft through `store`.
    ///
    /// Remote failures return the session to `Open` with `form_error` set
    /// and are also returned to the caller.
    pub async fn submit<B: CollectionBackend>(
        &self,
        store: &ResourceStore<B>,
    ) -> Result<SubmitOutcome, CoreError> {
        let mut gate = Gate::Ignored;
        self.state.send_if_modified(|state| {
            if !state.is_open() {
                return false;
            }
            let errors = self.schema.validate(&state.draft);
            let s = Arc::make_mut(state);
            if errors.is_empty() {
                s.phase = SessionPhase::Submitting;
                s.field_errors.clear();
                s.form_error = None;
                gate = Gate::Proceed {
                    mode: s.mode,
                    target: s.target_id.clone(),
                    draft: s.draft.clone(),
                };
            } else {
                s.field_errors.clone_from(&errors);
                gate = Gate::Invalid(errors);
            }
            true
        });

        let (mode, target, draft) = match gate {
            Gate::Ignored => {
                debug!(resource = %self.schema.resource, "submit ignored; session not open");
                return Ok(SubmitOutcome::Ignored);
            }
            Gate::Invalid(errors) => return Ok(SubmitOutcome::Invalid(errors)),
            Gate::Proceed {
                mode,
                target,
                draft,
            } => (mode, target, draft),
        };

        debug!(resource = %self.schema.resource, %mode, "submitting draft");
        let result = match (mode, target) {
            (SessionMode::Edit, Some(id)) => store.replace(&id, draft).await,
            (SessionMode::Edit, None) => Err(CoreError::transition("submit an edit", "no target record")),
            (SessionMode::Create, _) => store.add(draft).await,
        };

        match result {
            Ok(record) => {
                self.state.send_replace(Arc::new(EditSessionState::default()));
                Ok(SubmitOutcome::Committed(record))
            }
            Err(err) => {
                let info = err.info().unwrap_or_else(|| ErrorInfo::server(err.to_string()));
                self.state.send_modify(|state| {
                    let s = Arc::make_mut(state);
                    s.phase = SessionPhase::Open;
                    s.form_error = Some(info);
                });
                Err(err)
            }
        }
    }

    /// Discard the draft. Only while `Open`.
    pub fn cancel(&self) -> Result<(), CoreError> {
        self.transition("cancel", |state| {
            if !state.is_open() {
                return false;
            }
            *state = Arc::new(EditSessionState::default());
            true
        })
    }

    fn open(
        &self,
        operation: &'static str,
        mode: SessionMode,
        target_id: Option<RecordId>,
        draft: Record,
    ) -> Result<(), CoreError> {
        self.transition(operation, |state| {
            if state.phase != SessionPhase::Closed {
                return false;
            }
            *state = Arc::new(EditSessionState {
                phase: SessionPhase::Open,
                mode,
                target_id,
                draft,
                ..EditSessionState::default()
            });
            true
        })
    }

    /// Run `apply`; if it declines, report the state it declined in.
    fn transition(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut Arc<EditSessionState>) -> bool,
    ) -> Result<(), CoreError> {
        let mut refused_in = None;
        self.state.send_if_modified(|state| {
            let before = state.describe();
            let changed = apply(state);
            if !changed {
                refused_in = Some(before);
            }
            changed
        });
        match refused_in {
            None => Ok(()),
            Some(state) => Err(CoreError::transition(operation, state)),
        }
    }
}
