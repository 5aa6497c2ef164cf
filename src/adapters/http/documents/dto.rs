//! HTTP DTOs for document endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a document. Without `id` the store generates one.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub data: Value,
}

/// Request body for PATCH (merge) and PUT (replace).
#[derive(Debug, Clone, Deserialize)]
pub struct WriteDocumentRequest {
    pub data: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Query parameters for listing documents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub order_by: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct DocumentListResponse {
    pub collection: String,
    pub documents: Vec<Value>,
    pub count: usize,
}
