//! Authenticated caller of the admin API.
//!
//! Populated by any [`TokenVerifier`](crate::ports::TokenVerifier) adapter
//! from verified token claims; carries no provider-specific types.

use super::UserId;

/// Caller extracted from a verified bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminPrincipal {
    /// Subject of the token.
    pub uid: UserId,

    /// Email claim, if present.
    pub email: Option<String>,

    /// Whether the token carries the `admin` custom claim.
    pub admin: bool,
}

impl AdminPrincipal {
    pub fn new(uid: UserId, email: Option<String>, admin: bool) -> Self {
        Self { uid, email, admin }
    }

    /// Email for logs, or the uid when the token has none.
    pub fn label(&self) -> &str {
        self.email.as_deref().unwrap_or_else(|| self.uid.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_email() {
        let uid = UserId::new("u1").unwrap();
        let with_email = AdminPrincipal::new(uid.clone(), Some("a@b.io".to_string()), true);
        let without = AdminPrincipal::new(uid, None, false);

        assert_eq!(with_email.label(), "a@b.io");
        assert_eq!(without.label(), "u1");
    }
}
