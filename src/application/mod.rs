//! Application layer - Commands and their handlers.
//!
//! This layer coordinates between ports: writes go to the `DocumentStore`
//! and acknowledged writes are announced through the `ChangePublisher`.

pub mod handlers;

pub use handlers::{
    CreateDocumentCommand, CreateDocumentHandler, DeleteDocumentCommand, DeleteDocumentHandler,
    UpdateDocumentCommand, UpdateDocumentHandler,
};
