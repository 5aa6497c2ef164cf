//! Objects kept in the managed object storage bucket.

use serde_json::{json, Value};

use super::foundation::{Timestamp, ValidationError};

const MAX_PATH_BYTES: usize = 1024;

/// Validated object path inside the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath(String);

impl ObjectPath {
    pub fn new(path: impl Into<String>) -> Result<Self, ValidationError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(ValidationError::empty_field("path"));
        }
        if path.len() > MAX_PATH_BYTES {
            return Err(ValidationError::too_long("path", MAX_PATH_BYTES));
        }
        if path.starts_with('/') || path.split('/').any(|seg| seg.is_empty() || seg == "..") {
            return Err(ValidationError::invalid_format(
                "path",
                "must be a relative path without empty or '..' segments",
            ));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

/// Metadata of a stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub path: ObjectPath,
    pub size: u64,
    pub content_type: String,
    pub uploaded_at: Timestamp,
}

impl StoredObject {
    pub fn to_payload(&self) -> Value {
        json!({
            "path": self.path.as_str(),
            "name": self.path.file_name(),
            "size": self.size,
            "contentType": self.content_type,
            "uploadedAt": self.uploaded_at.to_rfc3339(),
        })
    }
}

/// Removes characters that would escape or break an object path.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_relative_path() {
        let path = ObjectPath::new("uploads/2024/a.png").unwrap();
        assert_eq!(path.file_name(), "a.png");
    }

    #[test]
    fn rejects_traversal_and_absolute() {
        assert!(ObjectPath::new("../etc/passwd").is_err());
        assert!(ObjectPath::new("/abs").is_err());
        assert!(ObjectPath::new("a//b").is_err());
    }

    #[test]
    fn sanitize_replaces_separators() {
        assert_eq!(sanitize_file_name("../my file?.txt"), "_my_file_.txt");
        assert_eq!(sanitize_file_name("..."), "file");
    }
}
