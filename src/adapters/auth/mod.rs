//! Authentication adapters.
//!
//! Implementations of the `TokenVerifier` port:
//!
//! - `jwt` - HS256 shared-secret verification
//! - `mock` - Fixed token table for tests and local development

mod jwt;
mod mock;

pub use jwt::{AdminClaims, Audience, JwtConfig, JwtTokenVerifier};
pub use mock::MockTokenVerifier;
