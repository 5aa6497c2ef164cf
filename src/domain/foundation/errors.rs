//! Field validation errors for inbound requests.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that occur while validating a single request field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' is too long (maximum {max} characters)")]
    TooLong { field: String, max: usize },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a too-long validation error.
    pub fn too_long(field: impl Into<String>, max: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::TooLong { field, .. } => field,
        }
    }

    /// Pairs this error with the rejected value for the wire.
    pub fn with_value(self, value: impl Into<Value>) -> FieldError {
        FieldError {
            field: self.field().to_string(),
            message: self.to_string(),
            value: value.into(),
        }
    }
}

/// One `{field, message, value}` triple of a validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub value: Value,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: value.into(),
        }
    }
}

/// Accumulates field errors so a request reports every problem at once.
#[derive(Debug, Default, Clone)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error of a failed check, keeping the value when it passed.
    pub fn check<T>(&mut self, result: Result<T, ValidationError>, value: impl Into<Value>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.0.push(e.with_value(value));
                None
            }
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("email");
        assert_eq!(format!("{}", err), "Field 'email' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("limit", 1, 1000, 5000);
        assert_eq!(
            format!("{}", err),
            "Field 'limit' must be between 1 and 1000, got 5000"
        );
    }

    #[test]
    fn with_value_builds_wire_triple() {
        let err = ValidationError::invalid_format("email", "missing @ symbol").with_value("bob");

        assert_eq!(err.field, "email");
        assert_eq!(err.message, "Field 'email' has invalid format: missing @ symbol");
        assert_eq!(err.value, json!("bob"));
    }

    #[test]
    fn field_errors_collects_only_failures() {
        let mut errors = FieldErrors::new();

        let ok: Option<u32> = errors.check(Ok(3), 3);
        let bad: Option<u32> = errors.check(Err(ValidationError::empty_field("name")), "");

        assert_eq!(ok, Some(3));
        assert!(bad.is_none());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.into_vec()[0].field, "name");
    }

    #[test]
    fn field_error_serializes_all_three_keys() {
        let err = FieldError::new("password", "too short", json!(null));
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["field"], "password");
        assert_eq!(json["message"], "too short");
        assert!(json.get("value").is_some());
    }
}
