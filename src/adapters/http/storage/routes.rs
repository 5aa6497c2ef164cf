//! HTTP routes for storage endpoints.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::adapters::memory::InMemoryObjectStorage;

use super::handlers::{
    delete_file, download_file, list_files, signed_url, upload_files, StorageHandlers,
};

/// Creates the authenticated storage router, mounted under `/api/storage`.
pub fn storage_routes(handlers: StorageHandlers) -> Router {
    let body_limit = handlers.limits().body_limit();
    Router::new()
        .route(
            "/upload",
            post(upload_files).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/files", get(list_files))
        .route("/files/*path", delete(delete_file))
        .route("/signed-url/*path", get(signed_url))
        .with_state(handlers)
}

/// Creates the signed download router, mounted under `/api/storage/download`.
pub fn download_routes(storage: Arc<InMemoryObjectStorage>) -> Router {
    Router::new()
        .route("/*path", get(download_file))
        .with_state(storage)
}
