//! Static mapping tables, keyed by fault kind then source code.

use crate::domain::fault::codes::{document, identity, token, upload};

/// One row of a mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingEntry {
    pub code: &'static str,
    pub http_status: u16,
    pub message: &'static str,
}

const fn entry(code: &'static str, http_status: u16, message: &'static str) -> MappingEntry {
    MappingEntry {
        code,
        http_status,
        message,
    }
}

/// Source-code rows for one kind plus the kind-level default.
pub struct KindTable {
    pub entries: &'static [(&'static str, MappingEntry)],
    pub default: MappingEntry,
}

impl KindTable {
    /// Looks up the specific row for `source_code`.
    pub fn specific(&self, source_code: &str) -> Option<&'static MappingEntry> {
        self.entries
            .iter()
            .find(|(key, _)| *key == source_code)
            .map(|(_, entry)| entry)
    }
}

pub const FALLBACK: MappingEntry = entry("internal-server-error", 500, "Internal server error");

pub const VALIDATION: MappingEntry = entry("validation-error", 400, "Validation failed");

pub static IDENTITY: KindTable = KindTable {
    entries: &[
        (identity::USER_NOT_FOUND, entry("user-not-found", 404, "User not found")),
        (
            identity::EMAIL_ALREADY_EXISTS,
            entry("email-already-exists", 409, "Email address is already in use"),
        ),
        (
            identity::UID_ALREADY_EXISTS,
            entry("uid-already-exists", 409, "User id is already in use"),
        ),
        (
            identity::PHONE_NUMBER_ALREADY_EXISTS,
            entry("phone-number-already-exists", 409, "Phone number is already in use"),
        ),
        (identity::INVALID_EMAIL, entry("invalid-email", 400, "Invalid email address")),
        (
            identity::INVALID_PASSWORD,
            entry("weak-password", 400, "Password must be at least 6 characters"),
        ),
        (
            identity::WEAK_PASSWORD,
            entry("weak-password", 400, "Password must be at least 6 characters"),
        ),
        (identity::INVALID_UID, entry("invalid-uid", 400, "Invalid user id")),
        (identity::INVALID_CLAIMS, entry("invalid-claims", 400, "Invalid custom claims")),
        (identity::USER_DISABLED, entry("user-disabled", 403, "User account is disabled")),
        (
            identity::TOO_MANY_REQUESTS,
            entry("too-many-requests", 429, "Too many requests, try again later"),
        ),
    ],
    default: entry("auth-error", 400, "Authentication provider error"),
};

pub static DOCUMENT: KindTable = KindTable {
    entries: &[
        (document::NOT_FOUND, entry("document-not-found", 404, "Document not found")),
        (
            document::ALREADY_EXISTS,
            entry("document-already-exists", 409, "Document already exists"),
        ),
        (
            document::INVALID_ARGUMENT,
            entry("invalid-argument", 400, "Invalid argument"),
        ),
        (
            document::FAILED_PRECONDITION,
            entry("failed-precondition", 400, "Operation precondition failed"),
        ),
        (document::OUT_OF_RANGE, entry("out-of-range", 400, "Value out of range")),
        (document::ABORTED, entry("aborted", 409, "Operation aborted due to contention")),
        (
            document::RESOURCE_EXHAUSTED,
            entry("resource-exhausted", 429, "Quota exceeded"),
        ),
        (
            document::UNAUTHENTICATED,
            entry("unauthenticated", 401, "Backend authentication required"),
        ),
        (
            document::PERMISSION_DENIED,
            entry("permission-denied", 403, "Permission denied"),
        ),
        (
            document::UNIMPLEMENTED,
            entry("not-implemented", 501, "Operation not implemented"),
        ),
        (document::INTERNAL, entry("internal", 500, "Internal database error")),
        (
            document::UNAVAILABLE,
            entry("service-unavailable", 503, "Database temporarily unavailable"),
        ),
        (
            document::DEADLINE_EXCEEDED,
            entry("deadline-exceeded", 504, "Database request timed out"),
        ),
    ],
    default: entry("internal", 500, "Internal database error"),
};

pub static TOKEN: KindTable = KindTable {
    entries: &[
        (token::MISSING, entry("no-token", 401, "Authorization token required")),
        (token::INVALID, entry("invalid-token", 401, "Invalid token")),
        (token::EXPIRED, entry("token-expired", 401, "Token expired")),
        (token::NOT_ACTIVE, entry("token-not-active", 401, "Token not yet active")),
        (token::REVOKED, entry("token-revoked", 401, "Token has been revoked")),
    ],
    default: entry("invalid-token", 401, "Invalid token"),
};

pub static UPLOAD: KindTable = KindTable {
    entries: &[
        (upload::SIZE_LIMIT, entry("file-upload-error", 413, "File too large")),
        (upload::COUNT_LIMIT, entry("file-upload-error", 400, "Too many files")),
        (upload::FIELD_TOO_LONG, entry("file-upload-error", 400, "Field value too long")),
        (upload::UNEXPECTED_FILE, entry("file-upload-error", 400, "Unexpected file field")),
        (upload::MISSING_FILE, entry("file-upload-error", 400, "No file provided")),
        (
            upload::UNSUPPORTED_TYPE,
            entry("file-upload-error", 415, "Unsupported file type"),
        ),
        (upload::OBJECT_NOT_FOUND, entry("file-not-found", 404, "File not found")),
        (
            upload::SIGNATURE_INVALID,
            entry("invalid-signature", 403, "Signed URL is invalid or expired"),
        ),
    ],
    default: entry("file-upload-error", 400, "File upload error"),
};
