//! Application handlers.
//!
//! Command handlers that orchestrate a backend write and its change event.

pub mod documents;

pub use documents::{
    CreateDocumentCommand, CreateDocumentHandler, DeleteDocumentCommand, DeleteDocumentHandler,
    UpdateDocumentCommand, UpdateDocumentHandler,
};
