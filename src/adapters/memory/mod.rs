//! In-memory backend adapters.
//!
//! Stand-ins for the managed document store, identity provider and file
//! bucket. They raise the same faults as the managed services, so the
//! normalizer and the HTTP surface behave identically against them.

mod document_store;
mod identity_provider;
mod object_storage;

pub use document_store::InMemoryDocumentStore;
pub use identity_provider::InMemoryIdentityProvider;
pub use object_storage::InMemoryObjectStorage;
