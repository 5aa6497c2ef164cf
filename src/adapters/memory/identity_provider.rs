//! In-memory identity provider.
//!
//! Enforces the same rules as the managed auth service (unique uid and
//! email, password strength, claim restrictions) and reports violations
//! with the provider's error codes.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::domain::fault::{codes, Fault};
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::users::{
    validate_claims, validate_email, validate_password, NewUser, UserRecord, UserUpdate,
};
use crate::ports::IdentityProvider;

struct StoredUser {
    record: UserRecord,
    password_digest: String,
}

#[derive(Default)]
pub struct InMemoryIdentityProvider {
    users: RwLock<HashMap<UserId, StoredUser>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether `password` matches the stored one for `uid`.
    pub async fn check_password(&self, uid: &UserId, password: &str) -> bool {
        self.users
            .read()
            .await
            .get(uid)
            .map(|u| u.password_digest == digest(password))
            .unwrap_or(false)
    }
}

fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Raises a provider error the way the managed SDK reports it, as a raw
/// `auth/<code>` string classified where it is caught.
fn provider_error(code: &str, message: impl Into<String>) -> Fault {
    Fault::classify(Some(&format!("auth/{}", code)), message)
}

fn user_not_found(uid: &UserId) -> Fault {
    provider_error(
        codes::identity::USER_NOT_FOUND,
        format!("There is no user record corresponding to the provided identifier: {}", uid),
    )
}

fn check_email(email: &str) -> Result<String, Fault> {
    validate_email(email)
        .map_err(|e| provider_error(codes::identity::INVALID_EMAIL, e.to_string()))?;
    Ok(email.trim().to_ascii_lowercase())
}

fn check_password(password: &str) -> Result<(), Fault> {
    validate_password(password)
        .map_err(|e| provider_error(codes::identity::INVALID_PASSWORD, e.to_string()))
}

fn email_taken(users: &HashMap<UserId, StoredUser>, email: &str, except: Option<&UserId>) -> bool {
    users.iter().any(|(uid, u)| {
        Some(uid) != except && u.record.email.as_deref() == Some(email)
    })
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, Fault> {
        let email = check_email(&user.email)?;
        check_password(&user.password)?;

        let mut users = self.users.write().await;
        let uid = user.uid.unwrap_or_else(UserId::generate);
        if users.contains_key(&uid) {
            return Err(provider_error(
                codes::identity::UID_ALREADY_EXISTS,
                format!("The user with the provided uid already exists: {}", uid),
            ));
        }
        if email_taken(&users, &email, None) {
            return Err(provider_error(
                codes::identity::EMAIL_ALREADY_EXISTS,
                "The email address is already in use by another account",
            ));
        }

        let record = UserRecord {
            uid: uid.clone(),
            email: Some(email),
            display_name: user.display_name,
            email_verified: user.email_verified,
            disabled: user.disabled,
            custom_claims: Map::new(),
            created_at: Timestamp::now(),
        };
        users.insert(
            uid,
            StoredUser {
                record: record.clone(),
                password_digest: digest(&user.password),
            },
        );
        Ok(record)
    }

    async fn get_user(&self, uid: &UserId) -> Result<UserRecord, Fault> {
        self.users
            .read()
            .await
            .get(uid)
            .map(|u| u.record.clone())
            .ok_or_else(|| user_not_found(uid))
    }

    async fn list_users(&self, max_results: u32) -> Result<Vec<UserRecord>, Fault> {
        let users = self.users.read().await;
        let mut records: Vec<UserRecord> = users.values().map(|u| u.record.clone()).collect();
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.uid.cmp(&b.uid))
        });
        records.truncate(max_results as usize);
        Ok(records)
    }

    async fn update_user(&self, uid: &UserId, update: UserUpdate) -> Result<UserRecord, Fault> {
        let email = update.email.as_deref().map(check_email).transpose()?;
        if let Some(password) = &update.password {
            check_password(password)?;
        }

        let mut users = self.users.write().await;
        if let Some(email) = &email {
            if email_taken(&users, email, Some(uid)) {
                return Err(provider_error(
                    codes::identity::EMAIL_ALREADY_EXISTS,
                    "The email address is already in use by another account",
                ));
            }
        }

        let stored = users.get_mut(uid).ok_or_else(|| user_not_found(uid))?;
        if let Some(email) = email {
            stored.record.email = Some(email);
        }
        if let Some(password) = &update.password {
            stored.password_digest = digest(password);
        }
        if let Some(name) = update.display_name {
            stored.record.display_name = Some(name).filter(|n| !n.is_empty());
        }
        if let Some(verified) = update.email_verified {
            stored.record.email_verified = verified;
        }
        if let Some(disabled) = update.disabled {
            stored.record.disabled = disabled;
        }
        Ok(stored.record.clone())
    }

    async fn delete_user(&self, uid: &UserId) -> Result<UserRecord, Fault> {
        self.users
            .write()
            .await
            .remove(uid)
            .map(|u| u.record)
            .ok_or_else(|| user_not_found(uid))
    }

    async fn set_custom_claims(
        &self,
        uid: &UserId,
        claims: Map<String, Value>,
    ) -> Result<UserRecord, Fault> {
        validate_claims(&claims)
            .map_err(|e| provider_error(codes::identity::INVALID_CLAIMS, e.to_string()))?;

        let mut users = self.users.write().await;
        let stored = users.get_mut(uid).ok_or_else(|| user_not_found(uid))?;
        stored.record.custom_claims = claims;
        Ok(stored.record.clone())
    }
}
