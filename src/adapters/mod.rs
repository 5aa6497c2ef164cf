//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the gateway to the outside world:
//! - `auth` - Bearer token verification (JWT, mock)
//! - `memory` - In-memory document store, identity provider and file bucket
//! - `http` - REST surface, envelopes and the error-normalization boundary
//! - `websocket` - Live collection updates and the change fan-out

pub mod auth;
pub mod http;
pub mod memory;
pub mod websocket;

pub use auth::{JwtConfig, JwtTokenVerifier, MockTokenVerifier};
pub use memory::{InMemoryDocumentStore, InMemoryIdentityProvider, InMemoryObjectStorage};
pub use websocket::FanOut;
