//! Broadcast topic, one per collection.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

const MAX_COLLECTION_BYTES: usize = 1500;

/// Name of a collection, doubling as its live-update topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("collection"));
        }
        if name.len() > MAX_COLLECTION_BYTES {
            return Err(ValidationError::too_long("collection", MAX_COLLECTION_BYTES));
        }
        if name.contains('/') {
            return Err(ValidationError::invalid_format(
                "collection",
                "must not contain '/'",
            ));
        }
        if name.starts_with("__") && name.ends_with("__") {
            return Err(ValidationError::invalid_format(
                "collection",
                "reserved collection name",
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Topic {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
