//! Coercion of stringly-typed upstream errors into [`Fault`] values.
//!
//! Backend clients surface failures as a bare code plus message. Adapters
//! that only have those two strings call [`Fault::classify`] once, at the
//! point the error is caught.

use super::codes::{document, token, upload};
use super::{Fault, FaultKind};

const IDENTITY_PREFIX: &str = "auth/";
const STORAGE_PREFIX: &str = "storage/";

impl Fault {
    /// Classifies a raw upstream code into the matching fault kind.
    ///
    /// Recognised shapes:
    /// - `auth/<code>` identity provider codes (token ones become token faults)
    /// - `storage/<code>` object storage codes
    /// - numeric or named RPC status codes from the document store
    /// - upload limit codes (`LIMIT_FILE_SIZE`, ...)
    /// - JWT library error names
    ///
    /// Anything else is a generic fault that keeps its code.
    pub fn classify(raw_code: Option<&str>, message: impl Into<String>) -> Fault {
        let message = message.into();
        let Some(raw) = raw_code.map(str::trim).filter(|c| !c.is_empty()) else {
            return Fault::generic(message);
        };

        if let Some(code) = raw.strip_prefix(IDENTITY_PREFIX) {
            return match identity_token_code(code) {
                Some(token_code) => Fault::token(token_code, message),
                None => Fault::identity(code, message),
            };
        }

        if let Some(code) = raw.strip_prefix(STORAGE_PREFIX) {
            return Fault::upload(code, message);
        }

        if let Some(code) = upload_limit_code(raw) {
            return Fault::upload(code, message);
        }

        if let Some(code) = jwt_error_code(raw) {
            return Fault::token(code, message);
        }

        if let Some(code) = rpc_status_name(raw) {
            return Fault::document_store(code, message);
        }

        Fault::new(FaultKind::Generic, Some(raw.to_string()), message)
    }
}

fn identity_token_code(code: &str) -> Option<&'static str> {
    match code {
        "id-token-expired" | "session-cookie-expired" => Some(token::EXPIRED),
        "id-token-revoked" | "session-cookie-revoked" => Some(token::REVOKED),
        "invalid-id-token" | "argument-error" | "invalid-session-cookie-duration" => {
            Some(token::INVALID)
        }
        _ => None,
    }
}

fn upload_limit_code(raw: &str) -> Option<&'static str> {
    match raw {
        "LIMIT_FILE_SIZE" => Some(upload::SIZE_LIMIT),
        "LIMIT_FILE_COUNT" | "LIMIT_PART_COUNT" | "LIMIT_FIELD_COUNT" => Some(upload::COUNT_LIMIT),
        "LIMIT_FIELD_KEY" | "LIMIT_FIELD_VALUE" => Some(upload::FIELD_TOO_LONG),
        "LIMIT_UNEXPECTED_FILE" => Some(upload::UNEXPECTED_FILE),
        _ => None,
    }
}

fn jwt_error_code(raw: &str) -> Option<&'static str> {
    match raw {
        "TokenExpiredError" => Some(token::EXPIRED),
        "NotBeforeError" => Some(token::NOT_ACTIVE),
        "JsonWebTokenError" => Some(token::INVALID),
        _ => None,
    }
}

/// Maps `5`, `NOT_FOUND` and `not-found` alike onto the canonical status name.
fn rpc_status_name(raw: &str) -> Option<&'static str> {
    if let Ok(numeric) = raw.parse::<usize>() {
        return document::BY_RPC_CODE.get(numeric).copied();
    }
    let normalized = raw.to_ascii_lowercase().replace('_', "-");
    document::BY_RPC_CODE
        .iter()
        .copied()
        .find(|name| *name == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fault::codes::identity;

    #[test]
    fn auth_prefixed_codes_become_identity_faults() {
        let fault = Fault::classify(Some("auth/user-not-found"), "no user");
        assert_eq!(fault.kind, FaultKind::IdentityProvider);
        assert_eq!(fault.source_code(), Some(identity::USER_NOT_FOUND));
    }

    #[test]
    fn expired_id_token_becomes_token_fault() {
        let fault = Fault::classify(Some("auth/id-token-expired"), "expired");
        assert_eq!(fault.kind, FaultKind::Token);
        assert_eq!(fault.source_code(), Some(token::EXPIRED));
    }

    #[test]
    fn revoked_id_token_normalizes_to_token_revoked() {
        let fault = Fault::classify(Some("auth/id-token-revoked"), "revoked");
        assert_eq!(fault.source_code(), Some(token::REVOKED));

        let normalized = crate::domain::normalizer::ErrorNormalizer::production().normalize(&fault);
        assert_eq!(normalized.code, "token-revoked");
        assert_eq!(normalized.http_status, 401);
    }

    #[test]
    fn numeric_rpc_codes_become_document_store_faults() {
        let fault = Fault::classify(Some("5"), "missing");
        assert_eq!(fault.kind, FaultKind::DocumentStore);
        assert_eq!(fault.source_code(), Some(document::NOT_FOUND));
    }

    #[test]
    fn screaming_rpc_names_are_normalized() {
        let fault = Fault::classify(Some("DEADLINE_EXCEEDED"), "slow");
        assert_eq!(fault.source_code(), Some(document::DEADLINE_EXCEEDED));
    }

    #[test]
    fn out_of_table_numeric_code_is_generic() {
        let fault = Fault::classify(Some("42"), "odd");
        assert_eq!(fault.kind, FaultKind::Generic);
        assert_eq!(fault.source_code(), Some("42"));
    }

    #[test]
    fn upload_limit_codes_become_upload_faults() {
        let fault = Fault::classify(Some("LIMIT_FILE_SIZE"), "File too large");
        assert_eq!(fault.kind, FaultKind::Upload);
        assert_eq!(fault.source_code(), Some(upload::SIZE_LIMIT));
    }

    #[test]
    fn jwt_names_become_token_faults() {
        let fault = Fault::classify(Some("NotBeforeError"), "jwt not active");
        assert_eq!(fault.kind, FaultKind::Token);
        assert_eq!(fault.source_code(), Some(token::NOT_ACTIVE));
    }

    #[test]
    fn missing_code_is_generic_without_code() {
        let fault = Fault::classify(None, "kaboom");
        assert_eq!(fault.kind, FaultKind::Generic);
        assert!(fault.source_code().is_none());
        assert_eq!(fault.message, "kaboom");
    }

    #[test]
    fn storage_prefix_becomes_upload_fault() {
        let fault = Fault::classify(Some("storage/object-not-found"), "gone");
        assert_eq!(fault.kind, FaultKind::Upload);
        assert_eq!(fault.source_code(), Some(upload::OBJECT_NOT_FOUND));
    }
}
