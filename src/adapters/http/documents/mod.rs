//! HTTP adapter for document endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateDocumentRequest, DocumentListResponse, ListDocumentsQuery, SortDirection,
    WriteDocumentRequest,
};
pub use handlers::DocumentHandlers;
pub use routes::document_routes;
