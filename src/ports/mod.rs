//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the gateway and the managed backend. Adapters implement these ports.
//!
//! ## Backend Ports
//!
//! - `DocumentStore` - Document database CRUD
//! - `IdentityProvider` - User administration
//! - `ObjectStorage` - File bucket
//! - `TokenVerifier` - Bearer token verification
//!
//! ## Realtime Ports
//!
//! - `ChangePublisher` - Broadcast of committed document mutations

mod change_publisher;
mod document_store;
mod identity_provider;
mod object_storage;
mod token_verifier;

pub use change_publisher::ChangePublisher;
pub use document_store::DocumentStore;
pub use identity_provider::IdentityProvider;
pub use object_storage::ObjectStorage;
pub use token_verifier::TokenVerifier;
