// ── Backend seam ──
//
// The four remote operations a resource store needs. Implemented by the
// REST `CollectionClient`; tests substitute an in-memory fake.

use std::future::Future;
use std::sync::Arc;

use backoffice_api::CollectionClient;

use crate::error::ErrorInfo;
use crate::model::{Record, RecordId};

/// Remote CRUD for one collection.
///
/// Every failure is already folded into an [`ErrorInfo`].
pub trait CollectionBackend: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<Record>, ErrorInfo>> + Send;

    fn create(&self, draft: &Record) -> impl Future<Output = Result<Record, ErrorInfo>> + Send;

    fn update(
        &self,
        id: &RecordId,
        patch: &Record,
    ) -> impl Future<Output = Result<Record, ErrorInfo>> + Send;

    fn delete(&self, id: &RecordId) -> impl Future<Output = Result<(), ErrorInfo>> + Send;
}

impl CollectionBackend for CollectionClient {
    async fn list(&self) -> Result<Vec<Record>, ErrorInfo> {
        Ok(CollectionClient::list(self).await?)
    }

    async fn create(&self, draft: &Record) -> Result<Record, ErrorInfo> {
        Ok(CollectionClient::create(self, draft).await?)
    }

    async fn update(&self, id: &RecordId, patch: &Record) -> Result<Record, ErrorInfo> {
        Ok(CollectionClient::update(self, id, patch).await?)
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ErrorInfo> {
        Ok(CollectionClient::delete(self, id).await?)
    }
}

impl<B: CollectionBackend> CollectionBackend for Arc<B> {
    fn list(&self) -> impl Future<Output = Result<Vec<Record>, ErrorInfo>> + Send {
        (**self).list()
    }

    fn create(&self, draft: &Record) -> impl Future<Output = Result<Record, ErrorInfo>> + Send {
        (**self).create(draft)
    }

    fn update(
        &self,
        id: &RecordId,
        patch: &Record,
    ) -> impl Future<Output = Result<Record, ErrorInfo>> + Send {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &RecordId) -> impl Future<Output = Result<(), ErrorInfo>> + Send {
        (**self).delete(id)
    }
}
