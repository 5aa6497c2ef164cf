//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("JWT secret must be at least {0} bytes in production")]
    JwtSecretTooShort(usize),

    #[error("Subscriber buffer must be between 1 and {0}")]
    InvalidSubscriberBuffer(usize),

    #[error("Delivery timeout must be between 1 and {0} milliseconds")]
    InvalidDeliveryTimeout(u64),

    #[error("Upload limit '{0}' must be greater than zero")]
    InvalidUploadLimit(&'static str),

    #[error("Signed URL TTL must be between 1 and {0} seconds")]
    InvalidSignedUrlTtl(u64),
}
