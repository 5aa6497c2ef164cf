//! Change events mirrored to live-update subscribers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::foundation::Topic;

/// Kind of mutation a change event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Created,
    Updated,
    Deleted,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Created => "created",
            OperationKind::Updated => "updated",
            OperationKind::Deleted => "deleted",
        }
    }
}

/// A single committed document mutation.
///
/// `payload` is the resulting document body, or the deleted body for
/// [`OperationKind::Deleted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub topic: Topic,
    pub operation_kind: OperationKind,
    pub resource_id: String,
    pub payload: Value,
}

impl ChangeEvent {
    pub fn new(
        topic: Topic,
        operation_kind: OperationKind,
        resource_id: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            topic,
            operation_kind,
            resource_id: resource_id.into(),
            payload,
        }
    }

    pub fn created(topic: Topic, resource_id: impl Into<String>, payload: Value) -> Self {
        Self::new(topic, OperationKind::Created, resource_id, payload)
    }

    pub fn updated(topic: Topic, resource_id: impl Into<String>, payload: Value) -> Self {
        Self::new(topic, OperationKind::Updated, resource_id, payload)
    }

    pub fn deleted(topic: Topic, resource_id: impl Into<String>, payload: Value) -> Self {
        Self::new(topic, OperationKind::Deleted, resource_id, payload)
    }
}
