//! DeleteDocumentHandler - Command handler for deleting documents.

use std::sync::Arc;

use crate::domain::change::ChangeEvent;
use crate::domain::documents::Document;
use crate::domain::fault::Fault;
use crate::domain::foundation::{DocumentId, Topic, UserId};
use crate::ports::{ChangePublisher, DocumentStore};

#[derive(Debug, Clone)]
pub struct DeleteDocumentCommand {
    pub collection: Topic,
    pub id: DocumentId,
    pub requested_by: UserId,
}

pub struct DeleteDocumentHandler {
    store: Arc<dyn DocumentStore>,
    publisher: Arc<dyn ChangePublisher>,
}

impl DeleteDocumentHandler {
    pub fn new(store: Arc<dyn DocumentStore>, publisher: Arc<dyn ChangePublisher>) -> Self {
        Self { store, publisher }
    }

    /// Deletes the document and returns the body it had.
    pub async fn handle(&self, cmd: DeleteDocumentCommand) -> Result<Document, Fault> {
        let removed = self.store.delete(&cmd.collection, &cmd.id).await?;

        let delivered = self
            .publisher
            .publish(ChangeEvent::deleted(
                removed.collection.clone(),
                removed.id.as_str(),
                removed.to_payload(),
            ))
            .await;

        tracing::info!(
            collection = %removed.collection,
            id = %removed.id,
            uid = %cmd.requested_by,
            delivered,
            "Document deleted"
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryDocumentStore;
    use crate::application::handlers::documents::test_support::RecordingPublisher;
    use crate::domain::change::OperationKind;
    use crate::domain::fault::codes;
    use serde_json::json;

    fn command(id: &str) -> DeleteDocumentCommand {
        DeleteDocumentCommand {
            collection: Topic::new("messages").unwrap(),
            id: DocumentId::new(id).unwrap(),
            requested_by: UserId::new("admin-1").unwrap(),
        }
    }

    #[tokio::test]
    async fn publishes_deleted_event_with_previous_body() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store
            .create(
                &Topic::new("messages").unwrap(),
                Some(DocumentId::new("m1").unwrap()),
                json!({"text": "bye"}).as_object().unwrap().clone(),
            )
            .await
            .unwrap();
        let publisher = Arc::new(RecordingPublisher::default());
        let handler = DeleteDocumentHandler::new(store, publisher.clone());

        handler.handle(command("m1")).await.unwrap();

        let events = publisher.events();
        assert_eq!(events[0].operation_kind, OperationKind::Deleted);
        assert_eq!(events[0].resource_id, "m1");
        assert_eq!(events[0].payload["data"]["text"], "bye");
    }

    #[tokio::test]
    async fn store_outage_publishes_nothing() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store
            .fail_next(Fault::document_store(codes::document::UNAVAILABLE, "backend down"))
            .await;
        let publisher = Arc::new(RecordingPublisher::default());
        let handler = DeleteDocumentHandler::new(store, publisher.clone());

        let fault = handler.handle(command("m1")).await.unwrap_err();

        assert_eq!(fault.source_code(), Some(codes::document::UNAVAILABLE));
        assert!(publisher.events().is_empty());
    }
}
