//! BaaS Admin - administrative REST/WebSocket gateway over a managed
//! backend-as-a-service.
//!
//! Every failure from the document store, identity provider, object storage
//! or token verification is normalized into one error envelope, and every
//! acknowledged document write is fanned out to live subscribers of its
//! collection.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
