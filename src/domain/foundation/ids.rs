//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a live-update socket connection.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Creates a new random ConnectionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ConnectionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConnectionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

const MAX_DOCUMENT_ID_BYTES: usize = 1500;
const MAX_UID_CHARS: usize = 128;

/// Identifier of a document inside a collection.
///
/// Follows the managed store's rules: non-empty, at most 1500 bytes,
/// no `/`, not `.` or `..`, and not of the reserved `__name__` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("id"));
        }
        if id.len() > MAX_DOCUMENT_ID_BYTES {
            return Err(ValidationError::too_long("id", MAX_DOCUMENT_ID_BYTES));
        }
        if id.contains('/') {
            return Err(ValidationError::invalid_format("id", "must not contain '/'"));
        }
        if id == "." || id == ".." {
            return Err(ValidationError::invalid_format("id", "must not be '.' or '..'"));
        }
        if id.len() > 4 && id.starts_with("__") && id.ends_with("__") {
            return Err(ValidationError::invalid_format("id", "reserved identifier"));
        }
        Ok(Self(id))
    }

    /// Creates a random 20-character id like the managed store's auto ids.
    pub fn generate() -> Self {
        let raw = Uuid::new_v4().simple().to_string();
        Self(raw.chars().take(20).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity-provider user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(uid: impl Into<String>) -> Result<Self, ValidationError> {
        let uid = uid.into();
        if uid.trim().is_empty() {
            return Err(ValidationError::empty_field("uid"));
        }
        if uid.chars().count() > MAX_UID_CHARS {
            return Err(ValidationError::too_long("uid", MAX_UID_CHARS));
        }
        Ok(Self(uid))
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
