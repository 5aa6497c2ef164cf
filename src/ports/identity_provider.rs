//! IdentityProvider port - user management in the managed auth service.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::fault::Fault;
use crate::domain::foundation::UserId;
use crate::domain::users::{NewUser, UserRecord, UserUpdate};

/// Port for administering identity-provider users.
///
/// Failures are identity-provider faults whose source code is the provider
/// error code without its `auth/` prefix (e.g. `user-not-found`).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, Fault>;

    async fn get_user(&self, uid: &UserId) -> Result<UserRecord, Fault>;

    /// Up to `max_results` users ordered by creation time.
    async fn list_users(&self, max_results: u32) -> Result<Vec<UserRecord>, Fault>;

    async fn update_user(&self, uid: &UserId, update: UserUpdate) -> Result<UserRecord, Fault>;

    /// Delete a user and return the record it had.
    async fn delete_user(&self, uid: &UserId) -> Result<UserRecord, Fault>;

    /// Replace the user's custom claims.
    async fn set_custom_claims(
        &self,
        uid: &UserId,
        claims: Map<String, Value>,
    ) -> Result<UserRecord, Fault>;
}
