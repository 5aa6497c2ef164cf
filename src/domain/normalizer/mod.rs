//! Error normalization.
//!
//! Converts any [`Fault`] into the single outward-facing [`NormalizedError`].
//! Lookup order is source-code row, then the kind default, then the global
//! fallback, so the most specific key always wins. Normalization is pure and
//! total: it never fails, never logs and never performs I/O.
//!
//! ```text
//! Fault { kind, source_code } ──► KindTable.specific(code)
//!                                   │ miss
//!                                   ▼
//!                                 KindTable.default
//!                                   │ no table (generic)
//!                                   ▼
//!                                 FALLBACK (500 internal-server-error)
//! ```

pub mod tables;

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::fault::{Fault, FaultKind};
use tables::{KindTable, MappingEntry};

/// Generic phrase shown for 5xx errors in production.
pub const GENERIC_SERVER_MESSAGE: &str = "Internal server error";

/// Log level the caller should use for a normalized error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Uniform, client-facing error shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    pub message: String,
    pub code: String,
    #[serde(rename = "statusCode")]
    pub http_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl NormalizedError {
    pub fn severity(&self) -> Severity {
        if self.http_status >= 500 {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.http_status >= 500
    }
}

/// Maps faults onto [`NormalizedError`] values.
///
/// Production mode hides upstream messages of 5xx errors and never emits
/// diagnostic details. Validation errors always carry their field list
/// because the caller needs it to fix the request.
#[derive(Debug, Clone, Copy)]
pub struct ErrorNormalizer {
    production: bool,
}

impl ErrorNormalizer {
    pub fn new(production: bool) -> Self {
        Self { production }
    }

    pub fn production() -> Self {
        Self::new(true)
    }

    pub fn diagnostic() -> Self {
        Self::new(false)
    }

    pub fn is_production(&self) -> bool {
        self.production
    }

    pub fn normalize(&self, fault: &Fault) -> NormalizedError {
        let table = match &fault.kind {
            FaultKind::Validation(errors) => return self.normalize_validation(fault, errors),
            FaultKind::IdentityProvider => Some(&tables::IDENTITY),
            FaultKind::DocumentStore => Some(&tables::DOCUMENT),
            FaultKind::Token => Some(&tables::TOKEN),
            FaultKind::Upload => Some(&tables::UPLOAD),
            FaultKind::Generic => None,
        };

        match table.map(|t| resolve(t, fault.source_code())) {
            Some(Resolved::Specific(entry)) => self.from_entry(fault, entry, true),
            Some(Resolved::KindDefault(entry)) => self.from_entry(fault, entry, false),
            None => self.from_entry(fault, &tables::FALLBACK, false),
        }
    }

    fn normalize_validation(
        &self,
        fault: &Fault,
        errors: &[crate::domain::foundation::FieldError],
    ) -> NormalizedError {
        let mut details = Map::new();
        details.insert("errors".to_string(), json!(errors));
        if !self.production {
            if let Some(detail) = &fault.original_detail {
                details.insert("originalDetail".to_string(), detail.clone());
            }
        }

        NormalizedError {
            message: if fault.message.is_empty() {
                tables::VALIDATION.message.to_string()
            } else {
                fault.message.clone()
            },
            code: tables::VALIDATION.code.to_string(),
            http_status: tables::VALIDATION.http_status,
            details: Some(Value::Object(details)),
        }
    }

    fn from_entry(&self, fault: &Fault, entry: &MappingEntry, specific: bool) -> NormalizedError {
        NormalizedError {
            message: self.message_for(fault, entry, specific),
            code: entry.code.to_string(),
            http_status: entry.http_status,
            details: self.diagnostics(fault),
        }
    }

    /// 4xx: the table phrase for specific rows, the upstream message for
    /// kind defaults. 5xx: a generic phrase in production, the upstream
    /// message otherwise.
    fn message_for(&self, fault: &Fault, entry: &MappingEntry, specific: bool) -> String {
        let upstream = fault.message.trim();
        if entry.http_status >= 500 {
            if self.production {
                return if specific {
                    entry.message.to_string()
                } else {
                    GENERIC_SERVER_MESSAGE.to_string()
                };
            }
            if upstream.is_empty() {
                return entry.message.to_string();
            }
            return upstream.to_string();
        }

        if specific || upstream.is_empty() {
            entry.message.to_string()
        } else {
            upstream.to_string()
        }
    }

    fn diagnostics(&self, fault: &Fault) -> Option<Value> {
        if self.production {
            return None;
        }
        let mut details = Map::new();
        details.insert("kind".to_string(), json!(fault.kind.name()));
        if let Some(code) = fault.source_code() {
            details.insert("sourceCode".to_string(), json!(code));
        }
        details.insert("originalMessage".to_string(), json!(fault.message));
        if let Some(detail) = &fault.original_detail {
            details.insert("originalDetail".to_string(), detail.clone());
        }
        Some(Value::Object(details))
    }
}

impl Default for ErrorNormalizer {
    fn default() -> Self {
        Self::production()
    }
}

enum Resolved {
    Specific(&'static MappingEntry),
    KindDefault(&'static MappingEntry),
}

fn resolve(table: &'static KindTable, source_code: Option<&str>) -> Resolved {
    source_code
        .and_then(|code| table.specific(code))
        .map(Resolved::Specific)
        .unwrap_or(Resolved::KindDefault(&table.default))
}
