//! Identity-provider user records and their input validation.

use serde_json::{json, Map, Value};

use super::foundation::{FieldErrors, Timestamp, UserId, ValidationError};

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MAX_DISPLAY_NAME_CHARS: usize = 256;
/// Serialized custom claims must stay below this many bytes.
pub const MAX_CLAIMS_BYTES: usize = 1000;
const RESERVED_CLAIMS: &[&str] = &[
    "acr", "amr", "at_hash", "aud", "auth_time", "azp", "cnf", "c_hash", "exp", "iat", "iss",
    "jti", "nbf", "nonce", "sub", "firebase",
];

/// A user as stored by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub uid: UserId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub disabled: bool,
    pub custom_claims: Map<String, Value>,
    pub created_at: Timestamp,
}

impl UserRecord {
    pub fn to_payload(&self) -> Value {
        json!({
            "uid": self.uid.as_str(),
            "email": self.email,
            "displayName": self.display_name,
            "emailVerified": self.email_verified,
            "disabled": self.disabled,
            "customClaims": Value::Object(self.custom_claims.clone()),
            "createdAt": self.created_at.to_rfc3339(),
        })
    }
}

/// Input for creating a user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewUser {
    pub uid: Option<UserId>,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
    pub disabled: bool,
}

/// Partial update of a user; `None` leaves the attribute untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub email_verified: Option<bool>,
    pub disabled: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password.is_none()
            && self.display_name.is_none()
            && self.email_verified.is_none()
            && self.disabled.is_none()
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace);
    if !well_formed {
        return Err(ValidationError::invalid_format("email", "must be a valid email address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::invalid_format(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_CHARS),
        ));
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err(ValidationError::too_long("displayName", MAX_DISPLAY_NAME_CHARS));
    }
    Ok(())
}

/// Custom claims: no reserved names, bounded serialized size.
pub fn validate_claims(claims: &Map<String, Value>) -> Result<(), ValidationError> {
    if let Some(reserved) = claims.keys().find(|k| RESERVED_CLAIMS.contains(&k.as_str())) {
        return Err(ValidationError::invalid_format(
            "claims",
            format!("'{}' is a reserved claim", reserved),
        ));
    }
    let size = Value::Object(claims.clone()).to_string().len();
    if size > MAX_CLAIMS_BYTES {
        return Err(ValidationError::too_long("claims", MAX_CLAIMS_BYTES));
    }
    Ok(())
}

impl NewUser {
    /// Validates every field, reporting all failures together.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(validate_email(&self.email), self.email.as_str());
        errors.check(validate_password(&self.password), Value::Null);
        if let Some(name) = &self.display_name {
            errors.check(validate_display_name(name), name.as_str());
        }
        errors
    }
}

impl UserUpdate {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(email) = &self.email {
            errors.check(validate_email(email), email.as_str());
        }
        if let Some(password) = &self.password {
            errors.check(validate_password(password), Value::Null);
        }
        if let Some(name) = &self.display_name {
            errors.check(validate_display_name(name), name.as_str());
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_plain_address() {
        assert!(validate_email("ada@example.com").is_ok());
    }

    #[test]
    fn email_validation_rejects_malformed() {
        for bad in ["", "ada", "ada@", "@example.com", "ada@example", "a b@example.com", "a@@b.io"] {
            assert!(validate_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn password_needs_six_chars() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn new_user_reports_every_bad_field() {
        let user = NewUser {
            email: "nope".to_string(),
            password: "123".to_string(),
            ..Default::default()
        };
        let errors = user.validate().into_vec();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "email");
        assert_eq!(errors[1].field, "password");
        assert_eq!(errors[1].value, Value::Null);
    }

    #[test]
    fn reserved_claims_are_rejected() {
        let mut claims = Map::new();
        claims.insert("sub".to_string(), json!("x"));
        assert!(validate_claims(&claims).is_err());

        let mut ok = Map::new();
        ok.insert("admin".to_string(), json!(true));
        assert!(validate_claims(&ok).is_ok());
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UserUpdate::default().is_empty());
        let update = UserUpdate {
            disabled: Some(true),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
