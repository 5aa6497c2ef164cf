//! Documents held by the managed document store.

use serde_json::{json, Map, Value};

use super::foundation::{DocumentId, Timestamp, Topic, ValidationError};

pub const DEFAULT_LIST_LIMIT: u32 = 100;
pub const MAX_LIST_LIMIT: u32 = 1000;

/// A stored document and its server timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub collection: Topic,
    pub id: DocumentId,
    pub data: Map<String, Value>,
    pub create_time: Timestamp,
    pub update_time: Timestamp,
}

impl Document {
    /// JSON body as returned to clients and carried in change events.
    pub fn to_payload(&self) -> Value {
        json!({
            "id": self.id.as_str(),
            "collection": self.collection.as_str(),
            "data": Value::Object(self.data.clone()),
            "createTime": self.create_time.to_rfc3339(),
            "updateTime": self.update_time.to_rfc3339(),
        })
    }
}

/// Listing options passed to the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub limit: u32,
    pub order_by: Option<String>,
    pub descending: bool,
}

impl ListQuery {
    pub fn new(
        limit: Option<u32>,
        order_by: Option<String>,
        descending: bool,
    ) -> Result<Self, ValidationError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if limit == 0 || limit > MAX_LIST_LIMIT {
            return Err(ValidationError::out_of_range(
                "limit",
                1,
                i64::from(MAX_LIST_LIMIT),
                i64::from(limit),
            ));
        }
        let order_by = order_by.filter(|f| !f.trim().is_empty());
        if let Some(field) = &order_by {
            validate_field_path(field)?;
        }
        Ok(Self {
            limit,
            order_by,
            descending,
        })
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            order_by: None,
            descending: false,
        }
    }
}

/// Field paths are dot-separated segments without empty parts.
fn validate_field_path(path: &str) -> Result<(), ValidationError> {
    if path.split('.').any(|segment| segment.trim().is_empty()) {
        return Err(ValidationError::invalid_format(
            "orderBy",
            "must be a dot-separated field path",
        ));
    }
    Ok(())
}

/// Document bodies must be JSON objects.
pub fn require_object(value: Value) -> Result<Map<String, Value>, ValidationError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::invalid_format("data", "must be a JSON object")),
    }
}
