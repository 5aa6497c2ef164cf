//! Token verification port for bearer tokens on admin routes.
//!
//! Provider-agnostic: the JWT adapter and the test mock both implement it.
//!
//! # Contract
//!
//! Implementations must verify signature, issuer, audience and the time
//! window, and report failures as token faults:
//! - `expired` when `exp` has passed
//! - `not-active` when `nbf` is in the future
//! - `revoked` when the provider revoked the token
//! - `invalid` for anything else

use async_trait::async_trait;

use crate::domain::fault::Fault;
use crate::domain::foundation::AdminPrincipal;

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a raw token (without the `Bearer ` prefix).
    async fn verify(&self, token: &str) -> Result<AdminPrincipal, Fault>;
}
