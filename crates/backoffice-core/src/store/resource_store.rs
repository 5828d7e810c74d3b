// ── Resource store ──
//
// Authoritative local copy of one remote collection. Mutations are
// fire-and-confirm: state changes only after the backend succeeds, and
// a failed call leaves `items` untouched.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::state::{CollectionState, LoadStatus};
use crate::backend::CollectionBackend;
use crate::error::{CoreError, ErrorInfo};
use crate::model::{EntitySchema, Record, RecordId};
use crate::stream::SnapshotStream;

/// Local mirror of one collection, published through a `watch` channel.
///
/// Reads are snapshot-based: [`snapshot`](Self::snapshot) hands out an
/// `Arc<CollectionState>` that never changes under the reader.
pub struct ResourceStore<B> {
    schema: Arc<EntitySchema>,
    backend: B,
    state: watch::Sender<Arc<CollectionState>>,
}

impl<B: CollectionBackend> ResourceStore<B> {
    pub fn new(schema: Arc<EntitySchema>, backend: B) -> Self {
        let (state, _) = watch::channel(Arc::new(CollectionState::default()));
        Self {
            schema,
            backend,
            state,
        }
    }

    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<CollectionState> {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.state.borrow().status
    }

    pub fn get(&self, id: &RecordId) -> Option<Arc<Record>> {
        self.state.borrow().get(id).cloned()
    }

    /// See [`CollectionState::find_by_display`].
    pub fn find_by_display(&self, raw: &str) -> Option<Arc<Record>> {
        self.state.borrow().find_by_display(raw).cloned()
    }

    pub fn subscribe(&self) -> SnapshotStream<CollectionState> {
        SnapshotStream::new(self.state.subscribe())
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch the full collection. Allowed only from `Idle` or `Failed`.
    ///
    /// Returns the number of records kept.
    pub async fn load(&self) -> Result<usize, CoreError> {
        self.begin_load()?;
        let resource = self.schema.resource.as_str();
        debug!(resource, "loading collection");

        match self.backend.list().await {
            Ok(records) => {
                let items = self.admit(records);
                let count = items.len();
                self.commit(|state| {
                    state.items = items;
                    state.status = LoadStatus::Ready;
                    state.last_error = None;
                    true
                });
                info!(resource, count, "collection loaded");
                Ok(count)
            }
            Err(err) => {
                warn!(resource, error = %err, "collection load failed");
                let stored = err.clone();
                self.commit(|state| {
                    state.status = LoadStatus::Failed;
                    state.last_error = Some(stored);
                    true
                });
                Err(err.into())
            }
        }
    }

    /// Create a record on the server and append the confirmed result.
    pub async fn add(&self, mut draft: Record) -> Result<Arc<Record>, CoreError> {
        draft.id = None;
        let draft = self.schema.normalize(draft);
        let created = self.backend.create(&draft).await?;

        let Some(id) = created.id.clone() else {
            return Err(ErrorInfo::server(format!(
                "server created a {} without an id",
                self.schema.singular
            ))
            .into());
        };
        let created = Arc::new(self.schema.normalize(created));

        let inserted = created.clone();
        self.commit(|state| {
            if let Some(slot) = state.items.iter_mut().find(|r| r.id.as_ref() == Some(&id)) {
                warn!(resource = %self.schema.resource, %id, "server reused an existing id; replacing");
                *slot = inserted;
            } else {
                state.items.push(inserted);
            }
            true
        });
        info!(resource = %self.schema.resource, %id, "record added");
        Ok(created)
    }

    /// Update a loaded record and merge the server's answer in place.
    ///
    /// Unknown ids fail with `NotFound` without a network call.
    pub async fn replace(&self, id: &RecordId, mut patch: Record) -> Result<Arc<Record>, CoreError> {
        let Some(current) = self.get(id) else {
            return Err(self.missing(id).into());
        };

        patch.id = None;
        let patch = self.schema.normalize(patch);
        let returned = self.backend.update(id, &patch).await?;
        let merged = Arc::new(self.schema.normalize(current.merged(&patch).merged(&returned)));

        let replacement = merged.clone();
        let applied = self.commit(|state| {
            match state.items.iter_mut().find(|r| r.id.as_ref() == Some(id)) {
                Some(slot) => {
                    *slot = replacement;
                    true
                }
                None => false,
            }
        });
        if applied {
            info!(resource = %self.schema.resource, %id, "record updated");
        } else {
            debug!(resource = %self.schema.resource, %id, "record vanished during update; not re-inserted");
        }
        Ok(merged)
    }

    /// Delete a loaded record. Returns the removed record.
    ///
    /// Unknown ids fail with `NotFound` without a network call.
    pub async fn remove(&self, id: &RecordId) -> Result<Arc<Record>, CoreError> {
        let Some(current) = self.get(id) else {
            return Err(self.missing(id).into());
        };

        self.backend.delete(id).await?;

        self.commit(|state| {
            let before = state.items.len();
            state.items.retain(|r| r.id.as_ref() != Some(id));
            state.items.len() != before
        });
        info!(resource = %self.schema.resource, %id, "record removed");
        Ok(current)
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Move to `Loading`, or report why we can't.
    fn begin_load(&self) -> Result<(), CoreError> {
        let mut current = LoadStatus::Idle;
        let started = self.state.send_if_modified(|state| {
            current = state.status;
            if !state.status.can_load() {
                return false;
            }
            let s = Arc::make_mut(state);
            s.status = LoadStatus::Loading;
            s.version += 1;
            true
        });

        if started {
            Ok(())
        } else {
            Err(CoreError::transition("load", current))
        }
    }

    /// Apply a change and publish it if `apply` reports one.
    fn commit(&self, apply: impl FnOnce(&mut CollectionState) -> bool) -> bool {
        self.state.send_if_modified(|state| {
            let s = Arc::make_mut(state);
            let changed = apply(s);
            if changed {
                s.version += 1;
            }
            changed
        })
    }

    /// Drop records without ids and duplicate ids (first one wins).
    fn admit(&self, records: Vec<Record>) -> Vec<Arc<Record>> {
        let resource = self.schema.resource.as_str();
        let mut seen = HashSet::with_capacity(records.len());
        let mut items = Vec::with_capacity(records.len());

        for record in records {
            let Some(id) = record.id.clone() else {
                warn!(resource, "skipping record without id");
                continue;
            };
            if !seen.insert(id.clone()) {
                warn!(resource, %id, "duplicate id in list response; keeping the first");
                continue;
            }
            items.push(Arc::new(self.schema.normalize(record)));
        }
        items
    }

    fn missing(&self, id: &RecordId) -> ErrorInfo {
        ErrorInfo::not_found(format!("{} {id} is not loaded", self.schema.singular))
    }
}
