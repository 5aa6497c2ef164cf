//! CreateDocumentHandler - Command handler for creating documents.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::change::ChangeEvent;
use crate::domain::documents::Document;
use crate::domain::fault::Fault;
use crate::domain::foundation::{DocumentId, Topic, UserId};
use crate::ports::{ChangePublisher, DocumentStore};

/// Command to create a document, with a caller-chosen id or a generated one.
#[derive(Debug, Clone)]
pub struct CreateDocumentCommand {
    pub collection: Topic,
    pub id: Option<DocumentId>,
    pub data: Map<String, Value>,
    pub requested_by: UserId,
}

/// Handler for creating documents.
pub struct CreateDocumentHandler {
    store: Arc<dyn DocumentStore>,
    publisher: Arc<dyn ChangePublisher>,
}

impl CreateDocumentHandler {
    pub fn new(store: Arc<dyn DocumentStore>, publisher: Arc<dyn ChangePublisher>) -> Self {
        Self { store, publisher }
    }

    pub async fn handle(&self, cmd: CreateDocumentCommand) -> Result<Document, Fault> {
        let document = self.store.create(&cmd.collection, cmd.id, cmd.data).await?;

        let delivered = self
            .publisher
            .publish(ChangeEvent::created(
                document.collection.clone(),
                document.id.as_str(),
                document.to_payload(),
            ))
            .await;

        tracing::info!(
            collection = %document.collection,
            id = %document.id,
            uid = %cmd.requested_by,
            delivered,
            "Document created"
        );
        Ok(document)
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

    fn command(id: Option<&str>) -> CreateDocumentCommand {
        CreateDocumentCommand {
            collection: Topic::new("posts").unwrap(),
            id: id.map(|i| DocumentId::new(i).unwrap()),
            data: json!({"title": "Hello"}).as_object().unwrap().clone(),
            requested_by: UserId::new("admin-1").unwrap(),
        }
    }

    #[tokio::test]
    async fn publishes_created_event_after_write() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let publisher = Arc::new(RecordingPublisher::default());
        let handler = CreateDocumentHandler::new(store.clone(), publisher.clone());

        let document = handler.handle(command(Some("p1"))).await.unwrap();

        let events = publisher.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].operation_kind, OperationKind::Created);
        assert_eq!(events[0].topic.as_str(), "posts");
        assert_eq!(events[0].resource_id, "p1");
        assert_eq!(events[0].payload["data"]["title"], "Hello");
        assert_eq!(store.document_count(&document.collection).await, 1);
    }

    #[tokio::test]
    async fn failed_write_publishes_nothing() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let publisher = Arc::new(RecordingPublisher::default());
        let handler = CreateDocumentHandler::new(store.clone(), publisher.clone());
        handler.handle(command(Some("p1"))).await.unwrap();

        let fault = handler.handle(command(Some("p1"))).await.unwrap_err();

        assert_eq!(fault.source_code(), Some(codes::document::ALREADY_EXISTS));
        assert_eq!(publisher.events().len(), 1);
    }
}
