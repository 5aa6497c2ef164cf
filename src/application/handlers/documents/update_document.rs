//! UpdateDocumentHandler - Command handler for merging or replacing documents.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::change::ChangeEvent;
use crate::domain::documents::Document;
use crate::domain::fault::Fault;
use crate::domain::foundation::{DocumentId, Topic, UserId};
use crate::ports::{ChangePublisher, DocumentStore};

#[derive(Debug, Clone)]
pub struct UpdateDocumentCommand {
    pub collection: Topic,
    pub id: DocumentId,
    pub data: Map<String, Value>,
    /// Merge into the existing body instead of replacing it.
    pub merge: bool,
    pub requested_by: UserId,
}

pub struct UpdateDocumentHandler {
    store: Arc<dyn DocumentStore>,
    publisher: Arc<dyn ChangePublisher>,
}

impl UpdateDocumentHandler {
    pub fn new(store: Arc<dyn DocumentStore>, publisher: Arc<dyn ChangePublisher>) -> Self {
        Self { store, publisher }
    }

    pub async fn handle(&self, cmd: UpdateDocumentCommand) -> Result<Document, Fault> {
        let document = self
            .store
            .update(&cmd.collection, &cmd.id, cmd.data, cmd.merge)
            .await?;

        let delivered = self
            .publisher
            .publish(ChangeEvent::updated(
                document.collection.clone(),
                document.id.as_str(),
                document.to_payload(),
            ))
            .await;

        tracing::info!(
            collection = %document.collection,
            id = %document.id,
            uid = %cmd.requested_by,
            merge = cmd.merge,
            delivered,
            "Document updated"
        );
        Ok(document)
    }
}
