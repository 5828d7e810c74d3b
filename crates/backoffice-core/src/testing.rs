#![allow(clippy::unwrap_used)]
// In-memory `CollectionBackend` for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use crate::backend::CollectionBackend;
use crate::error::ErrorInfo;
use crate::model::{Record, RecordId};

#[derive(Debug, Default)]
pub(crate) struct Calls {
    pub list: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
}

/// Fake backend holding records in a `Vec`. Every call yields once to the
/// scheduler before doing its work, so concurrent callers interleave.
#[derive(Debug, Default)]
pub(crate) struct MemoryBackend {
    records: Mutex<Vec<Record>>,
    next_id: AtomicI64,
    failure: Mutex<Option<ErrorInfo>>,
    canned: Mutex<Option<Record>>,
    pub calls: Calls,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    pub fn seeded(records: Vec<Record>) -> Self {
        let next = records
            .iter()
            .filter_map(|r| match r.id {
                Some(RecordId::Int(n)) => Some(n),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            records: Mutex::new(records),
            next_id: AtomicI64::new(next),
            ..Self::default()
        }
    }

    /// Make the next call (of any kind) fail with `info`.
    pub fn fail_next(&self, info: ErrorInfo) {
        *self.failure.lock().unwrap() = Some(info);
    }

    /// Make the next `create` answer with `record` verbatim.
    pub fn respond_to_create(&self, record: Record) {
        *self.canned.lock().unwrap() = Some(record);
    }

    /// Server-side contents, bypassing the store.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> Option<ErrorInfo> {
        self.failure.lock().unwrap().take()
    }
}

impl CollectionBackend for MemoryBackend {
    async fn list(&self) -> Result<Vec<Record>, ErrorInfo> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.records())
    }

    async fn create(&self, draft: &Record) -> Result<Record, ErrorInfo> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        if let Some(canned) = self.canned.lock().unwrap().take() {
            return Ok(canned);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = draft.without_id().with_id(id);
        self.records.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &RecordId, patch: &Record) -> Result<Record, ErrorInfo> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let mut records = self.records.lock().unwrap();
        let Some(slot) = records.iter_mut().find(|r| r.id.as_ref() == Some(id)) else {
            return Err(ErrorInfo::not_found(format!("no record {id}")));
        };
        *slot = slot.merged(patch);
        Ok(slot.clone())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ErrorInfo> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id.as_ref() != Some(id));
        if records.len() == before {
            return Err(ErrorInfo::not_found(format!("no record {id}")));
        }
        Ok(())
    }
}
