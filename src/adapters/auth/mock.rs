//! Mock token verifier for testing and local development.
//!
//! # Example
//!
//! ```ignore
//! let verifier = MockTokenVerifier::new()
//!     .with_principal("valid-token", AdminPrincipal::new(uid, None, true));
//!
//! let principal = verifier.verify("valid-token").await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::fault::{codes, Fault};
use crate::domain::foundation::AdminPrincipal;
use crate::ports::TokenVerifier;

/// Maps fixed tokens to principals. Unknown tokens are `invalid`.
#[derive(Debug, Default, Clone)]
pub struct MockTokenVerifier {
    tokens: HashMap<String, AdminPrincipal>,
    /// Returned for every verification when set.
    forced: Option<Fault>,
}

impl MockTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_principal(mut self, token: impl Into<String>, principal: AdminPrincipal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }

    /// Forces every verification to fail with `fault`.
    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.forced = Some(fault);
        self
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

#[async_trait]
impl TokenVerifier for MockTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AdminPrincipal, Fault> {
        if let Some(fault) = &self.forced {
            return Err(fault.clone());
        }
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| Fault::token(codes::token::INVALID, "Token is not recognised"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn principal() -> AdminPrincipal {
        AdminPrincipal::new(UserId::new("u1").unwrap(), None, true)
    }

    #[tokio::test]
    async fn known_token_returns_principal() {
        let verifier = MockTokenVerifier::new().with_principal("t", principal());
        assert_eq!(verifier.verify("t").await.unwrap(), principal());
        assert_eq!(verifier.token_count(), 1);
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let fault = MockTokenVerifier::new().verify("t").await.unwrap_err();
        assert_eq!(fault.source_code(), Some(codes::token::INVALID));
    }

    #[tokio::test]
    async fn forced_fault_wins() {
        let verifier = MockTokenVerifier::new()
            .with_principal("t", principal())
            .with_fault(Fault::token(codes::token::EXPIRED, "expired"));

        let fault = verifier.verify("t").await.unwrap_err();
        assert_eq!(fault.source_code(), Some(codes::token::EXPIRED));
    }
}
