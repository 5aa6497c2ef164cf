//! File bucket configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_SIGNED_URL_TTL_SECS: u64 = 7 * 24 * 3600;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Bucket name
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// HMAC key for signed download URLs
    pub signing_secret: SecretString,

    /// Default lifetime of signed URLs
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_secs: u64,

    /// Public base URL that signed download links start with
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl StorageConfig {
    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bucket.trim().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__BUCKET"));
        }
        if self.signing_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__SIGNING_SECRET"));
        }
        if self.signed_url_ttl_secs == 0 || self.signed_url_ttl_secs > MAX_SIGNED_URL_TTL_SECS {
            return Err(ValidationError::InvalidSignedUrlTtl(MAX_SIGNED_URL_TTL_SECS));
        }
        Ok(())
    }
}

fn default_bucket() -> String {
    "baas-admin".to_string()
}

fn default_signed_url_ttl() -> u64 {
    900
}

fn default_public_base_url() -> String {
    "http://localhost:8080/api/storage/download".to_string()
}
