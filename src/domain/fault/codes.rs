//! Upstream source codes recognised by the normalizer tables.

/// Identity provider error codes (without the `auth/` prefix).
pub mod identity {
    pub const USER_NOT_FOUND: &str = "user-not-found";
    pub const EMAIL_ALREADY_EXISTS: &str = "email-already-exists";
    pub const UID_ALREADY_EXISTS: &str = "uid-already-exists";
    pub const PHONE_NUMBER_ALREADY_EXISTS: &str = "phone-number-already-exists";
    pub const INVALID_EMAIL: &str = "invalid-email";
    pub const INVALID_PASSWORD: &str = "invalid-password";
    pub const WEAK_PASSWORD: &str = "weak-password";
    pub const INVALID_UID: &str = "invalid-uid";
    pub const INVALID_CLAIMS: &str = "invalid-claims";
    pub const USER_DISABLED: &str = "user-disabled";
    pub const TOO_MANY_REQUESTS: &str = "too-many-requests";
}

/// Document store status names.
pub mod document {
    pub const NOT_FOUND: &str = "not-found";
    pub const ALREADY_EXISTS: &str = "already-exists";
    pub const INVALID_ARGUMENT: &str = "invalid-argument";
    pub const FAILED_PRECONDITION: &str = "failed-precondition";
    pub const OUT_OF_RANGE: &str = "out-of-range";
    pub const ABORTED: &str = "aborted";
    pub const RESOURCE_EXHAUSTED: &str = "resource-exhausted";
    pub const UNIMPLEMENTED: &str = "unimplemented";
    pub const INTERNAL: &str = "internal";
    pub const UNAVAILABLE: &str = "unavailable";
    pub const DEADLINE_EXCEEDED: &str = "deadline-exceeded";
    pub const UNAUTHENTICATED: &str = "unauthenticated";
    pub const PERMISSION_DENIED: &str = "permission-denied";

    /// Status names indexed by their numeric RPC code.
    pub const BY_RPC_CODE: [&str; 17] = [
        "ok",
        "cancelled",
        "unknown",
        INVALID_ARGUMENT,
        DEADLINE_EXCEEDED,
        NOT_FOUND,
        ALREADY_EXISTS,
        PERMISSION_DENIED,
        RESOURCE_EXHAUSTED,
        FAILED_PRECONDITION,
        ABORTED,
        OUT_OF_RANGE,
        UNIMPLEMENTED,
        INTERNAL,
        UNAVAILABLE,
        "data-loss",
        UNAUTHENTICATED,
    ];
}

/// Bearer token verification failures.
pub mod token {
    pub const MISSING: &str = "missing";
    pub const INVALID: &str = "invalid";
    pub const EXPIRED: &str = "expired";
    pub const NOT_ACTIVE: &str = "not-active";
    pub const REVOKED: &str = "revoked";
}

/// Upload and object storage failures.
pub mod upload {
    pub const SIZE_LIMIT: &str = "size-limit";
    pub const COUNT_LIMIT: &str = "count-limit";
    pub const FIELD_TOO_LONG: &str = "field-too-long";
    pub const UNEXPECTED_FILE: &str = "unexpected-file";
    pub const MISSING_FILE: &str = "missing-file";
    pub const UNSUPPORTED_TYPE: &str = "unsupported-type";
    pub const OBJECT_NOT_FOUND: &str = "object-not-found";
    pub const SIGNATURE_INVALID: &str = "signature-invalid";
}
