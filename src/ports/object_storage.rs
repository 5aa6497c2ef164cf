//! ObjectStorage port - the managed file bucket.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::fault::Fault;
use crate::domain::storage::{ObjectPath, StoredObject};

/// Port for storing and serving uploaded files.
///
/// Missing objects are reported as upload faults with `object-not-found`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `path`, replacing any existing object.
    async fn upload(
        &self,
        path: &ObjectPath,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, Fault>;

    /// Objects whose path starts with `prefix`, sorted by path.
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, Fault>;

    async fn delete(&self, path: &ObjectPath) -> Result<StoredObject, Fault>;

    /// Time-limited read URL for an existing object.
    async fn signed_url(&self, path: &ObjectPath, ttl: Duration) -> Result<String, Fault>;
}
