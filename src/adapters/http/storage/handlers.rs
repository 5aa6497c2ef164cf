//! HTTP handlers for storage endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};

use crate::adapters::http::envelope::ApiResponse;
use crate::adapters::http::error::FaultResponse;
use crate::adapters::http::extract::QueryParams;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::memory::InMemoryObjectStorage;
use crate::config::UploadConfig;
use crate::domain::storage::ObjectPath;
use crate::ports::ObjectStorage;

use super::dto::{DownloadQuery, FileListResponse, ListFilesQuery, SignedUrlResponse};
use super::upload::read_upload;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct StorageHandlers {
    storage: Arc<dyn ObjectStorage>,
    limits: Arc<UploadConfig>,
    signed_url_ttl: Duration,
}

impl StorageHandlers {
    pub fn new(storage: Arc<dyn ObjectStorage>, limits: UploadConfig, signed_url_ttl: Duration) -> Self {
        Self {
            storage,
            limits: Arc::new(limits),
            signed_url_ttl,
        }
    }

    pub fn limits(&self) -> &UploadConfig {
        &self.limits
    }
}

fn parse_path(raw: &str) -> Result<ObjectPath, FaultResponse> {
    ObjectPath::new(raw).map_err(|e| FaultResponse::invalid(e, raw))
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/storage/upload - Upload one or more files
pub async fn upload_files(
    State(handlers): State<StorageHandlers>,
    RequireAuth(admin): RequireAuth,
    multipart: Multipart,
) -> Result<ApiResponse<FileListResponse>, FaultResponse> {
    let form = read_upload(multipart, handlers.limits()).await?;

    let mut stored = Vec::with_capacity(form.files.len());
    for file in form.files {
        let path = parse_path(&format!("{}/{}", form.folder, file.file_name))?;
        let object = handlers
            .storage
            .upload(&path, file.bytes, &file.content_type)
            .await?;
        tracing::info!(path = %path.as_str(), size = object.size, by = %admin.label(), "File uploaded");
        stored.push(object.to_payload());
    }

    Ok(ApiResponse::created(FileListResponse {
        count: stored.len(),
        files: stored,
    })
    .with_message("Files uploaded"))
}

/// GET /api/storage/files - List stored files
pub async fn list_files(
    State(handlers): State<StorageHandlers>,
    RequireAuth(_admin): RequireAuth,
    QueryParams(params): QueryParams<ListFilesQuery>,
) -> Result<ApiResponse<FileListResponse>, FaultResponse> {
    let prefix = params.prefix.unwrap_or_default();
    let files: Vec<Value> = handlers
        .storage
        .list(&prefix)
        .await?
        .iter()
        .map(|o| o.to_payload())
        .collect();

    Ok(ApiResponse::ok(FileListResponse {
        count: files.len(),
        files,
    }))
}

/// DELETE /api/storage/files/*path - Delete a file
pub async fn delete_file(
    State(handlers): State<StorageHandlers>,
    RequireAuth(admin): RequireAuth,
    Path(path): Path<String>,
) -> Result<ApiResponse<Value>, FaultResponse> {
    let path = parse_path(&path)?;
    let object = handlers.storage.delete(&path).await?;
    tracing::info!(path = %path.as_str(), by = %admin.label(), "File deleted");

    Ok(ApiResponse::ok(json!({ "path": object.path.as_str() })).with_message("File deleted"))
}

/// GET /api/storage/signed-url/*path - Time-limited download URL
pub async fn signed_url(
    State(handlers): State<StorageHandlers>,
    RequireAuth(_admin): RequireAuth,
    Path(path): Path<String>,
) -> Result<ApiResponse<SignedUrlResponse>, FaultResponse> {
    let path = parse_path(&path)?;
    let url = handlers.storage.signed_url(&path, handlers.signed_url_ttl).await?;

    Ok(ApiResponse::ok(SignedUrlResponse {
        path: path.as_str().to_string(),
        url,
        expires_in: handlers.signed_url_ttl.as_secs(),
    }))
}

/// GET /api/storage/download/*path - Serve a signed URL
///
/// Authorized by the URL signature rather than a bearer token.
pub async fn download_file(
    State(storage): State<Arc<InMemoryObjectStorage>>,
    Path(path): Path<String>,
    QueryParams(params): QueryParams<DownloadQuery>,
) -> Result<Response, FaultResponse> {
    let path = parse_path(&path)?;
    let (object, bytes) = storage
        .download(&path, params.expires, &params.signature)
        .await?;

    let disposition = format!("inline; filename=\"{}\"", object.path.file_name());
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, object.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(bytes),
    )
        .into_response())
}
