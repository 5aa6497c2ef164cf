//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and validation errors that form
//! the vocabulary of the admin gateway.

mod auth;
mod errors;
mod ids;
mod timestamp;
mod topic;

pub use auth::AdminPrincipal;
pub use errors::{FieldError, FieldErrors, ValidationError};
pub use ids::{ConnectionId, DocumentId, UserId};
pub use timestamp::Timestamp;
pub use topic::Topic;
