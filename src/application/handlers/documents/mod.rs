//! Document command handlers.
//!
//! Each mutating operation writes through the `DocumentStore` first and
//! publishes a `ChangeEvent` only once the write is acknowledged. A failed
//! write returns its fault and publishes nothing.

mod create_document;
mod delete_document;
mod update_document;

pub use create_document::{CreateDocumentCommand, CreateDocumentHandler};
pub use delete_document::{DeleteDocumentCommand, DeleteDocumentHandler};
pub use update_document::{UpdateDocumentCommand, UpdateDocumentHandler};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::change::ChangeEvent;
    use crate::ports::ChangePublisher;

    /// Publisher that records every event it is handed.
    #[derive(Default)]
    pub struct RecordingPublisher {
        events: Mutex<Vec<ChangeEvent>>,
    }

    impl RecordingPublisher {
        pub fn events(&self) -> Vec<ChangeEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChangePublisher for RecordingPublisher {
        async fn publish(&self, event: ChangeEvent) -> usize {
            self.events.lock().unwrap().push(event);
            1
        }
    }
}
