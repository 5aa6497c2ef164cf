//! HTTP adapters - REST API implementations.
//!
//! Each backend surface has its own HTTP adapter; `router` assembles them
//! behind the shared auth and error-normalization layers.

pub mod documents;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod health;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod users;

pub use envelope::ApiResponse;
pub use error::{normalize_errors, FailureEnvelope, FaultResponse};
pub use router::{build_router, AppComponents, RouterSettings};
