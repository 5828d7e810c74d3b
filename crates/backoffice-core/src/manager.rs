// ── Resource manager ──
//
// One collection screen's worth of state: the store, the query state,
// and the edit session, behind a single intent dispatcher.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::backend::CollectionBackend;
use crate::error::{CoreError, ErrorInfo};
use crate::intent::{Intent, IntentResult};
use crate::model::EntitySchema;
use crate::query::{self, QueryState, QueryView, SortSpec};
use crate::session::{EditSession, EditSessionState};
use crate::store::{CollectionState, ResourceStore};
use crate::stream::SnapshotStream;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct ManagerSnapshot {
    pub collection: Arc<CollectionState>,
    pub query: Arc<QueryState>,
    pub view: QueryView,
    pub session: Arc<EditSessionState>,
}

pub struct ResourceManager<B> {
    store: ResourceStore<B>,
    query: watch::Sender<Arc<QueryState>>,
    session: EditSession,
}

impl<B: CollectionBackend> ResourceManager<B> {
    /// Build a manager with the schema's default sort and `page_size`.
    pub fn new(schema: EntitySchema, backend: B, page_size: NonZeroUsize) -> Self {
        let schema = Arc::new(schema);
        let query = QueryState::new(page_size).with_sort(schema.default_sort.clone());
        let (query, _) = watch::channel(Arc::new(query));
        Self {
            session: EditSession::new(schema.clone()),
            store: ResourceStore::new(schema, backend),
            query,
        }
    }

    pub fn schema(&self) -> &Arc<EntitySchema> {
        self.store.schema()
    }

    pub fn store(&self) -> &ResourceStore<B> {
        &self.store
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn query(&self) -> Arc<QueryState> {
        self.query.borrow().clone()
    }

    /// The visible page, derived on every call.
    pub fn view(&self) -> QueryView {
        query::run(self.schema(), &self.store.snapshot().items, &self.query())
    }

    pub fn snapshot(&self) -> ManagerSnapshot {
        let collection = self.store.snapshot();
        let query = self.query();
        let view = query::run(self.schema(), &collection.items, &query);
        ManagerSnapshot {
            collection,
            query,
            view,
            session: self.session.state(),
        }
    }

    pub fn subscribe_collection(&self) -> SnapshotStream<CollectionState> {
        self.store.subscribe()
    }

    pub fn subscribe_query(&self) -> SnapshotStream<QueryState> {
        SnapshotStream::new(self.query.subscribe())
    }

    pub fn subscribe_session(&self) -> SnapshotStream<EditSessionState> {
        self.session.subscribe()
    }

    // ── Query state ──────────────────────────────────────────────────

    pub fn set_filter(&self, text: impl Into<String>) {
        let text = text.into();
        self.update_query(|q| q.set_filter(text));
    }

    pub fn set_sort(&self, sort: Option<SortSpec>) {
        self.update_query(|q| q.set_sort(sort));
    }

    pub fn set_page(&self, page: NonZeroUsize) {
        self.update_query(|q| q.set_page(page));
    }

    pub fn set_page_size(&self, page_size: NonZeroUsize) {
        self.update_query(|q| q.set_page_size(page_size));
    }

    fn update_query(&self, apply: impl FnOnce(&mut QueryState)) {
        self.query.send_modify(|q| apply(Arc::make_mut(q)));
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    pub async fn load(&self) -> Result<usize, CoreError> {
        self.store.load().await
    }

    /// Route one intent to the store, the session, or the query state.
    pub async fn dispatch(&self, intent: Intent) -> Result<IntentResult, CoreError> {
        debug!(resource = %self.schema().resource, ?intent, "dispatch");
        match intent {
            Intent::Load => {
                let count = self.store.load().await?;
                Ok(IntentResult::Loaded { count })
            }
            Intent::Add(draft) => Ok(IntentResult::Saved(self.store.add(draft).await?)),
            Intent::Replace { id, patch } => {
                Ok(IntentResult::Saved(self.store.replace(&id, patch).await?))
            }
            Intent::Remove { id } => Ok(IntentResult::Removed(self.store.remove(&id).await?)),

            Intent::OpenForCreate => {
                self.session.open_for_create()?;
                Ok(IntentResult::Ok)
            }
            Intent::OpenForEdit { id } => {
                let record = self.store.get(&id).ok_or_else(|| {
                    ErrorInfo::not_found(format!("{} {id} is not loaded", self.schema().singular))
                })?;
                self.session.open_for_edit(&record)?;
                Ok(IntentResult::Ok)
            }
            Intent::UpdateField { name, value } => {
                self.session.update_field(&name, value)?;
                Ok(IntentResult::Ok)
            }
            Intent::Submit => Ok(IntentResult::Submitted(self.session.submit(&self.store).await?)),
            Intent::Cancel => {
                self.session.cancel()?;
                Ok(IntentResult::Ok)
            }

            Intent::SetFilter(text) => {
                self.set_filter(text);
                Ok(IntentResult::Ok)
            }
            Intent::SetSort(sort) => {
                self.set_sort(sort);
                Ok(IntentResult::Ok)
            }
            Intent::SetPage(page) => {
                self.set_page(page);
                Ok(IntentResult::Ok)
            }
            Intent::SetPageSize(size) => {
                self.set_page_size(size);
                Ok(IntentResult::Ok)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{Record, RecordId};
    use crate::session::SubmitOutcome;
    use crate::testing::MemoryBackend;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn ids(view: &QueryView) -> Vec<RecordId> {
        view.items.iter().filter_map(|r| r.id.clone()).collect()
    }

    fn products() -> ResourceManager<Arc<MemoryBackend>> {
        let backend = MemoryBackend::seeded(vec![
            Record::new().with_id(1).with("title", "Desk").with("price", 10),
            Record::new().with_id(2).with("title", "Lamp").with("price", 5),
            Record::new().with_id(3).with("title", "Desk Lamp").with("price", 20),
        ]);
        ResourceManager::new(EntitySchema::products(), Arc::new(backend), nz(10))
    }

    #[tokio::test]
    async fn price_sort_both_directions() {
        let manager = products();
        manager.dispatch(Intent::Load).await.unwrap();

        // Products start sorted by price ascending.
        assert_eq!(
            ids(&manager.view()),
            vec![RecordId::Int(2), RecordId::Int(1), RecordId::Int(3)]
        );

        manager
            .dispatch(Intent::SetSort(Some(SortSpec::descending("price"))))
            .await
            .unwrap();
        assert_eq!(
            ids(&manager.view()),
            vec![RecordId::Int(3), RecordId::Int(1), RecordId::Int(2)]
        );
    }

    #[tokio::test]
    async fn users_filter_keeps_matches_only() {
        let backend = MemoryBackend::seeded(vec![
            Record::new().with_id(1).with("firstName", "John"),
            Record::new().with_id(2).with("firstName", "Jane"),
        ]);
        let manager = ResourceManager::new(EntitySchema::users(), Arc::new(backend), nz(10));
        manager.load().await.unwrap();

        manager.dispatch(Intent::SetFilter("jo".into())).await.unwrap();

        let view = manager.view();
        assert_eq!(view.total, 1);
        assert_eq!(view.items[0].text("firstName"), Some("John"));
    }

    #[tokio::test]
    async fn filter_change_resets_page() {
        let manager = products();
        manager.load().await.unwrap();
        manager.set_page_size(nz(1));
        manager.set_filter("nothing matches");
        manager.set_page(nz(3));
        assert!(manager.view().is_empty());

        manager.dispatch(Intent::SetFilter("lamp".into())).await.unwrap();

        let view = manager.view();
        assert_eq!(view.page, NonZeroUsize::MIN);
        assert_eq!(ids(&view), vec![RecordId::Int(2)]);
    }

    #[tokio::test]
    async fn add_then_view_shows_new_record() {
        let manager = products();
        manager.load().await.unwrap();
        manager
            .store()
            .backend()
            .respond_to_create(Record::new().with_id(42).with("title", "X").with("price", 1));

        let result = manager
            .dispatch(Intent::Add(Record::new().with("title", "X")))
            .await
            .unwrap();

        let IntentResult::Saved(record) = result else {
            panic!("expected Saved");
        };
        assert_eq!(record.id, Some(RecordId::Int(42)));
        let snap = manager.snapshot();
        assert_eq!(snap.collection.len(), 4);
        assert_eq!(snap.view.items[0].id, Some(RecordId::Int(42)));
    }

    #[tokio::test]
    async fn form_intents_drive_edit_session() {
        let manager = products();
        manager.load().await.unwrap();

        manager
            .dispatch(Intent::OpenForEdit { id: RecordId::Int(2) })
            .await
            .unwrap();
        manager
            .dispatch(Intent::UpdateField {
                name: "price".into(),
                value: json!("7.5"),
            })
            .await
            .unwrap();
        // The seeded lamp lacks description and images.
        let invalid = manager.dispatch(Intent::Submit).await.unwrap();
        assert!(matches!(invalid, IntentResult::Submitted(SubmitOutcome::Invalid(_))));

        for (name, value) in [("description", "A lamp"), ("images", "lamp.png")] {
            manager
                .dispatch(Intent::UpdateField {
                    name: name.into(),
                    value: json!(value),
                })
                .await
                .unwrap();
        }
        let submitted = manager.dispatch(Intent::Submit).await.unwrap();
        assert!(matches!(submitted, IntentResult::Submitted(SubmitOutcome::Committed(_))));

        let lamp = manager.store().get(&RecordId::Int(2)).unwrap();
        assert_eq!(lamp.get("price"), Some(&json!(7.5)));
        assert!(!manager.session().state().is_open());
    }

    #[tokio::test]
    async fn open_for_edit_unknown_id_is_not_found() {
        let manager = products();
        manager.load().await.unwrap();

        let err = manager
            .dispatch(Intent::OpenForEdit { id: RecordId::Int(99) })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn remove_intent_returns_removed_record() {
        let manager = products();
        manager.load().await.unwrap();

        let result = manager
            .dispatch(Intent::Remove { id: RecordId::Int(1) })
            .await
            .unwrap();
        assert!(matches!(result, IntentResult::Removed(r) if r.id == Some(RecordId::Int(1))));
        assert_eq!(manager.view().total, 2);
    }

    #[tokio::test]
    async fn query_subscribers_see_changes() {
        let manager = products();
        let mut sub = manager.subscribe_query();
        manager.set_filter("desk");
        let q = sub.changed().await.unwrap();
        assert_eq!(q.filter_text(), "desk");
    }
}
