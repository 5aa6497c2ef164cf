//! HTTP handlers for document endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use serde_json::Value;

use crate::adapters::http::envelope::ApiResponse;
use crate::adapters::http::error::FaultResponse;
use crate::adapters::http::extract::{JsonBody, QueryParams};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::documents::{
    CreateDocumentCommand, CreateDocumentHandler, DeleteDocumentCommand, DeleteDocumentHandler,
    UpdateDocumentCommand, UpdateDocumentHandler,
};
use crate::domain::documents::{require_object, ListQuery};
use crate::domain::fault::Fault;
use crate::domain::foundation::{DocumentId, FieldErrors, Topic};
use crate::ports::{ChangePublisher, DocumentStore};

use super::dto::{
    CreateDocumentRequest, DocumentListResponse, ListDocumentsQuery, SortDirection,
    WriteDocumentRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DocumentHandlers {
    store: Arc<dyn DocumentStore>,
    create_handler: Arc<CreateDocumentHandler>,
    update_handler: Arc<UpdateDocumentHandler>,
    delete_handler: Arc<DeleteDocumentHandler>,
}

impl DocumentHandlers {
    pub fn new(store: Arc<dyn DocumentStore>, publisher: Arc<dyn ChangePublisher>) -> Self {
        Self {
            create_handler: Arc::new(CreateDocumentHandler::new(store.clone(), publisher.clone())),
            update_handler: Arc::new(UpdateDocumentHandler::new(store.clone(), publisher.clone())),
            delete_handler: Arc::new(DeleteDocumentHandler::new(store.clone(), publisher)),
            store,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Path parsing
// ════════════════════════════════════════════════════════════════════════════

fn parse_target(collection: &str, id: &str) -> Result<(Topic, DocumentId), FaultResponse> {
    let mut errors = FieldErrors::new();
    let topic = errors.check(Topic::new(collection), collection);
    let id = errors.check(DocumentId::new(id), id);
    match (topic, id) {
        (Some(topic), Some(id)) => Ok((topic, id)),
        _ => Err(Fault::validation(errors.into_vec()).into()),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/collections/:collection/documents - List documents
pub async fn list_documents(
    State(handlers): State<DocumentHandlers>,
    RequireAuth(_admin): RequireAuth,
    Path(collection): Path<String>,
    QueryParams(params): QueryParams<ListDocumentsQuery>,
) -> Result<ApiResponse<DocumentListResponse>, FaultResponse> {
    let mut errors = FieldErrors::new();
    let topic = errors.check(Topic::new(collection.as_str()), collection.as_str());
    let query = errors.check(
        ListQuery::new(
            params.limit,
            params.order_by.clone(),
            params.direction == SortDirection::Desc,
        ),
        Value::Null,
    );
    Fault::check_fields(errors)?;
    let (Some(topic), Some(query)) = (topic, query) else {
        return Err(Fault::generic("list parameters rejected without field errors").into());
    };

    let documents = handlers.store.list(&topic, &query).await?;
    let documents: Vec<Value> = documents.iter().map(|d| d.to_payload()).collect();

    Ok(ApiResponse::ok(DocumentListResponse {
        collection: topic.to_string(),
        count: documents.len(),
        documents,
    }))
}

/// POST /api/collections/:collection/documents - Create a document
pub async fn create_document(
    State(handlers): State<DocumentHandlers>,
    RequireAuth(admin): RequireAuth,
    Path(collection): Path<String>,
    JsonBody(req): JsonBody<CreateDocumentRequest>,
) -> Result<ApiResponse<Value>, FaultResponse> {
    let mut errors = FieldErrors::new();
    let topic = errors.check(Topic::new(collection.as_str()), collection.as_str());
    let id = match &req.id {
        Some(raw) => errors.check(DocumentId::new(raw.as_str()), raw.as_str()).map(Some),
        None => Some(None),
    };
    let data = errors.check(require_object(req.data.clone()), req.data);
    Fault::check_fields(errors)?;
    let (Some(collection), Some(id), Some(data)) = (topic, id, data) else {
        return Err(Fault::generic("create request rejected without field errors").into());
    };

    let document = handlers
        .create_handler
        .handle(CreateDocumentCommand {
            collection,
            id,
            data,
            requested_by: admin.uid,
        })
        .await?;

    Ok(ApiResponse::created(document.to_payload()).with_message("Document created"))
}

/// GET /api/collections/:collection/documents/:id - Fetch one document
pub async fn get_document(
    State(handlers): State<DocumentHandlers>,
    RequireAuth(_admin): RequireAuth,
    Path((collection, id)): Path<(String, String)>,
) -> Result<ApiResponse<Value>, FaultResponse> {
    let (topic, id) = parse_target(&collection, &id)?;
    let document = handlers.store.get(&topic, &id).await?;
    Ok(ApiResponse::ok(document.to_payload()))
}

/// PATCH /api/collections/:collection/documents/:id - Merge into a document
pub async fn patch_document(
    state: State<DocumentHandlers>,
    auth: RequireAuth,
    path: Path<(String, String)>,
    body: JsonBody<WriteDocumentRequest>,
) -> Result<ApiResponse<Value>, FaultResponse> {
    write_document(state, auth, path, body, true).await
}

/// PUT /api/collections/:collection/documents/:id - Replace a document
pub async fn replace_document(
    state: State<DocumentHandlers>,
    auth: RequireAuth,
    path: Path<(String, String)>,
    body: JsonBody<WriteDocumentRequest>,
) -> Result<ApiResponse<Value>, FaultResponse> {
    write_document(state, auth, path, body, false).await
}

async fn write_document(
    State(handlers): State<DocumentHandlers>,
    RequireAuth(admin): RequireAuth,
    Path((collection, id)): Path<(String, String)>,
    JsonBody(req): JsonBody<WriteDocumentRequest>,
    merge: bool,
) -> Result<ApiResponse<Value>, FaultResponse> {
    let (collection, id) = parse_target(&collection, &id)?;
    let data = require_object(req.data.clone()).map_err(|e| FaultResponse::invalid(e, req.data))?;

    let document = handlers
        .update_handler
        .handle(UpdateDocumentCommand {
            collection,
            id,
            data,
            merge,
            requested_by: admin.uid,
        })
        .await?;

    Ok(ApiResponse::ok(document.to_payload()).with_message("Document updated"))
}

/// DELETE /api/collections/:collection/documents/:id - Delete a document
pub async fn delete_document(
    State(handlers): State<DocumentHandlers>,
    RequireAuth(admin): RequireAuth,
    Path((collection, id)): Path<(String, String)>,
) -> Result<ApiResponse<Value>, FaultResponse> {
    let (collection, id) = parse_target(&collection, &id)?;

    let removed = handlers
        .delete_handler
        .handle(DeleteDocumentCommand {
            collection,
            id,
            requested_by: admin.uid,
        })
        .await?;

    Ok(ApiResponse::ok(removed.to_payload()).with_message("Document deleted"))
}
