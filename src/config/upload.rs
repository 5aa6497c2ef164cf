//! Multipart upload limits

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted file in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: usize,

    /// Most files accepted in one request
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Longest accepted non-file field value in bytes
    #[serde(default = "default_max_field_length")]
    pub max_field_length: usize,

    /// Name of the multipart field carrying files
    #[serde(default = "default_file_field")]
    pub file_field: String,

    /// Accepted content types (comma-separated); empty accepts any
    pub allowed_content_types: Option<String>,
}

impl UploadConfig {
    pub fn allowed_content_types_list(&self) -> Vec<String> {
        self.allowed_content_types
            .as_ref()
            .map(|s| {
                s.split(',')
                    .map(|t| t.trim().to_ascii_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `content_type` may be uploaded. `type/*` entries match any subtype.
    pub fn accepts(&self, content_type: &str) -> bool {
        let allowed = self.allowed_content_types_list();
        if allowed.is_empty() {
            return true;
        }
        let content_type = content_type.to_ascii_lowercase();
        allowed.iter().any(|a| match a.strip_suffix("/*") {
            Some(family) => content_type.split('/').next() == Some(family),
            None => *a == content_type,
        })
    }

    /// Body limit for the upload route: every file plus form overhead.
    pub fn body_limit(&self) -> usize {
        self.max_file_size_bytes
            .saturating_mul(self.max_files)
            .saturating_add(64 * 1024)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_file_size_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit("max_file_size_bytes"));
        }
        if self.max_files == 0 {
            return Err(ValidationError::InvalidUploadLimit("max_files"));
        }
        if self.max_field_length == 0 {
            return Err(ValidationError::InvalidUploadLimit("max_field_length"));
        }
        if self.file_field.trim().is_empty() {
            return Err(ValidationError::MissingRequired("UPLOAD__FILE_FIELD"));
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            max_files: default_max_files(),
            max_field_length: default_max_field_length(),
            file_field: default_file_field(),
            allowed_content_types: None,
        }
    }
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024
}

fn default_max_files() -> usize {
    5
}

fn default_max_field_length() -> usize {
    1024
}

fn default_file_field() -> String {
    "file".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_accept_anything() {
        let config = UploadConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.accepts("application/x-anything"));
    }

    #[test]
    fn test_wildcard_content_types() {
        let config = UploadConfig {
            allowed_content_types: Some("image/*, application/pdf".to_string()),
            ..Default::default()
        };
        assert!(config.accepts("image/png"));
        assert!(config.accepts("Application/PDF"));
        assert!(!config.accepts("text/plain"));
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let config = UploadConfig {
            max_files: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidUploadLimit("max_files"))
        ));
    }

    #[test]
    fn test_body_limit_covers_all_files() {
        let config = UploadConfig {
            max_file_size_bytes: 100,
            max_files: 2,
            ..Default::default()
        };
        assert_eq!(config.body_limit(), 200 + 64 * 1024);
    }
}
