//! HTTP DTOs for storage endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilesQuery {
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Query of a signed download URL.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadQuery {
    pub expires: u64,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileListResponse {
    pub files: Vec<Value>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    pub path: String,
    pub url: String,
    pub expires_in: u64,
}
