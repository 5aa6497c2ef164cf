//! HTTP routes for document endpoints.

use axum::{
    routing::get,
    Router,
};

use super::handlers::{
    create_document, delete_document, get_document, list_documents, patch_document,
    replace_document, DocumentHandlers,
};

/// Creates the document router, mounted under `/api/collections`.
pub fn document_routes(handlers: DocumentHandlers) -> Router {
    Router::new()
        .route(
            "/:collection/documents",
            get(list_documents).post(create_document),
        )
        .route(
            "/:collection/documents/:id",
            get(get_document)
                .patch(patch_document)
                .put(replace_document)
                .delete(delete_document),
        )
        .with_state(handlers)
}
