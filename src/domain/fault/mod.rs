//! Upstream faults.
//!
//! A [`Fault`] is built exactly where a backend call fails, tagged with the
//! collaborator that raised it. Nothing downstream re-inspects error shapes;
//! the [`normalizer`](crate::domain::normalizer) keys its tables on
//! [`FaultKind`] and the upstream source code.

mod classify;
pub mod codes;

use std::fmt;

use serde_json::Value;

use super::foundation::{FieldError, FieldErrors};

/// Which upstream collaborator raised a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum FaultKind {
    IdentityProvider,
    DocumentStore,
    Validation(Vec<FieldError>),
    Token,
    Upload,
    Generic,
}

impl FaultKind {
    /// Stable kebab-case name, used in diagnostics and logs.
    pub fn name(&self) -> &'static str {
        match self {
            FaultKind::IdentityProvider => "identity-provider-fault",
            FaultKind::DocumentStore => "document-store-fault",
            FaultKind::Validation(_) => "validation-fault",
            FaultKind::Token => "token-fault",
            FaultKind::Upload => "upload-fault",
            FaultKind::Generic => "generic-fault",
        }
    }
}

/// Raw failure from an upstream call, prior to normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    pub kind: FaultKind,
    pub source_code: Option<String>,
    pub message: String,
    pub original_detail: Option<Value>,
}

impl Fault {
    pub fn new(kind: FaultKind, source_code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            source_code,
            message: message.into(),
            original_detail: None,
        }
    }

    pub fn identity(code: &str, message: impl Into<String>) -> Self {
        Self::new(FaultKind::IdentityProvider, Some(code.to_string()), message)
    }

    pub fn document_store(code: &str, message: impl Into<String>) -> Self {
        Self::new(FaultKind::DocumentStore, Some(code.to_string()), message)
    }

    pub fn token(code: &str, message: impl Into<String>) -> Self {
        Self::new(FaultKind::Token, Some(code.to_string()), message)
    }

    pub fn upload(code: &str, message: impl Into<String>) -> Self {
        Self::new(FaultKind::Upload, Some(code.to_string()), message)
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Generic, None, message)
    }

    /// Validation fault carrying every offending field.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        let message = match errors.as_slice() {
            [single] => single.message.clone(),
            _ => format!("Validation failed for {} fields", errors.len()),
        };
        Self::new(FaultKind::Validation(errors), None, message)
    }

    /// Turns collected field errors into a fault, or `Ok` when there are none.
    pub fn check_fields(errors: FieldErrors) -> Result<(), Fault> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self::validation(errors.into_vec()))
        }
    }

    /// Attaches the opaque upstream payload for diagnostics.
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.original_detail = Some(detail);
        self
    }

    pub fn source_code(&self) -> Option<&str> {
        self.source_code.as_deref()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_code {
            Some(code) => write!(f, "[{}/{}] {}", self.kind.name(), code, self.message),
            None => write!(f, "[{}] {}", self.kind.name(), self.message),
        }
    }
}

impl std::error::Error for Fault {}

impl From<FieldError> for Fault {
    fn from(error: FieldError) -> Self {
        Self::validation(vec![error])
    }
}
