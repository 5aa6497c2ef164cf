//! Domain layer containing the gateway's own semantics.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, topics, validation errors)
//! - `fault` - Tagged upstream failures and their classification
//! - `normalizer` - Fault to client error mapping tables
//! - `change` - Change events mirrored to live-update subscribers
//! - `documents` - Document store records and listing options
//! - `users` - Identity provider records and input validation
//! - `storage` - Object storage paths and metadata

pub mod change;
pub mod documents;
pub mod fault;
pub mod foundation;
pub mod normalizer;
pub mod storage;
pub mod users;
