//! Multipart upload parsing under the configured limits.
//!
//! Limit violations become upload faults so the normalizer reports them
//! with the file-upload codes rather than as generic client errors.

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use serde_json::Value;

use crate::config::UploadConfig;
use crate::domain::fault::{codes, Fault};
use crate::domain::foundation::FieldError;
use crate::domain::storage::sanitize_file_name;

/// Text field naming the destination folder.
pub const FOLDER_FIELD: &str = "folder";
pub const DEFAULT_FOLDER: &str = "uploads";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One accepted file, fully buffered.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Everything read from an upload form.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm {
    pub folder: String,
    pub files: Vec<UploadedFile>,
}

pub async fn read_upload(mut multipart: Multipart, limits: &UploadConfig) -> Result<UploadForm, Fault> {
    let mut folder = DEFAULT_FOLDER.to_string();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_fault)? {
        let name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_none() {
            let value = field.text().await.map_err(multipart_fault)?;
            if value.chars().count() > limits.max_field_length {
                return Err(Fault::upload(
                    codes::upload::FIELD_TOO_LONG,
                    format!("Field '{}' exceeds {} characters", name, limits.max_field_length),
                ));
            }
            if name == FOLDER_FIELD && !value.trim().is_empty() {
                folder = value.trim().trim_matches('/').to_string();
            }
            continue;
        }

        if name != limits.file_field {
            return Err(Fault::upload(
                codes::upload::UNEXPECTED_FILE,
                format!("Unexpected file field '{}'", name),
            ));
        }
        if files.len() >= limits.max_files {
            return Err(Fault::upload(
                codes::upload::COUNT_LIMIT,
                format!("At most {} files may be uploaded at once", limits.max_files),
            ));
        }

        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        if !limits.accepts(&content_type) {
            return Err(Fault::upload(
                codes::upload::UNSUPPORTED_TYPE,
                format!("Content type '{}' is not accepted", content_type),
            ));
        }

        let file_name = sanitize_file_name(field.file_name().unwrap_or_default());
        let bytes = read_limited(field, limits.max_file_size_bytes).await?;
        files.push(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    if files.is_empty() {
        return Err(Fault::upload(
            codes::upload::MISSING_FILE,
            format!("Expected a file in field '{}'", limits.file_field),
        ));
    }

    Ok(UploadForm { folder, files })
}

async fn read_limited(mut field: Field<'_>, max_bytes: usize) -> Result<Vec<u8>, Fault> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_fault)? {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(size_limit(max_bytes));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn size_limit(max_bytes: usize) -> Fault {
    Fault::upload(
        codes::upload::SIZE_LIMIT,
        format!("File exceeds the {} byte limit", max_bytes),
    )
}

fn multipart_fault(error: MultipartError) -> Fault {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Fault::upload(codes::upload::SIZE_LIMIT, error.body_text());
    }
    Fault::from(FieldError::new("body", error.body_text(), Value::Null))
}
