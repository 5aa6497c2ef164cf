//! HTTP middleware for axum.
//!
//! - `auth` - Bearer token verification and the `RequireAuth` extractor

pub mod auth;

pub use auth::{auth_middleware, bearer_token, AuthState, RequireAuth};
