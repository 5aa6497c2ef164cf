//! DocumentStore port - the managed document database.
//!
//! Every failure is returned as a document-store [`Fault`] carrying the
//! upstream status name as its source code.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::documents::{Document, ListQuery};
use crate::domain::fault::Fault;
use crate::domain::foundation::{DocumentId, Topic};

/// Port for document CRUD against the managed store.
///
/// Implementations must only return `Ok` once the write is acknowledged
/// by the backend; callers publish change events on that signal.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document. Generates an id when none is given.
    ///
    /// Fails with `already-exists` when `id` is taken.
    async fn create(
        &self,
        collection: &Topic,
        id: Option<DocumentId>,
        data: Map<String, Value>,
    ) -> Result<Document, Fault>;

    /// Fetch a document; `not-found` when absent.
    async fn get(&self, collection: &Topic, id: &DocumentId) -> Result<Document, Fault>;

    /// List documents of a collection.
    async fn list(&self, collection: &Topic, query: &ListQuery) -> Result<Vec<Document>, Fault>;

    /// Update an existing document.
    ///
    /// With `merge`, top-level fields are merged into the stored body;
    /// otherwise the body is replaced. `not-found` when absent.
    async fn update(
        &self,
        collection: &Topic,
        id: &DocumentId,
        data: Map<String, Value>,
        merge: bool,
    ) -> Result<Document, Fault>;

    /// Delete a document and return the body it had.
    async fn delete(&self, collection: &Topic, id: &DocumentId) -> Result<Document, Fault>;
}
