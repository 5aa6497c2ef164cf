//! HTTP DTOs for user endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::users::{NewUser, UserUpdate};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub uid: Option<String>,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub email_verified: Option<bool>,
    pub disabled: Option<bool>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        UserUpdate {
            email: req.email,
            password: req.password,
            display_name: req.display_name,
            email_verified: req.email_verified,
            disabled: req.disabled,
        }
    }
}

impl CreateUserRequest {
    /// Domain form, minus the uid which is parsed separately.
    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            uid: None,
            email: self.email.clone(),
            password: self.password.clone(),
            display_name: self.display_name.clone(),
            email_verified: self.email_verified,
            disabled: self.disabled,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetClaimsRequest {
    pub claims: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    #[serde(default)]
    pub max_results: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    pub users: Vec<Value>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_flags() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"email": "a@b.io", "password": "secret1"}"#).unwrap();

        assert!(!req.email_verified);
        assert!(!req.disabled);
        assert!(req.to_new_user().uid.is_none());
    }

    #[test]
    fn update_request_maps_to_domain() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"displayName": "Ada", "disabled": true}"#).unwrap();
        let update = UserUpdate::from(req);

        assert_eq!(update.display_name.as_deref(), Some("Ada"));
        assert_eq!(update.disabled, Some(true));
        assert!(update.email.is_none());
    }
}
