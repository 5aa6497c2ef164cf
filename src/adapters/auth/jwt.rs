//! HS256 JWT adapter for bearer token verification.
//!
//! Implements the `TokenVerifier` port against a shared secret:
//!
//! 1. Validate the signature with the configured secret
//! 2. Validate `exp` and `nbf`, plus `iss`/`aud` when configured
//! 3. Map claims to the domain `AdminPrincipal`
//!
//! Every failure is a token fault with a source code from
//! [`codes::token`](crate::domain::fault::codes::token).

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::fault::{codes, Fault};
use crate::domain::foundation::{AdminPrincipal, UserId};
use crate::ports::TokenVerifier;

/// Configuration for the JWT adapter.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: SecretString,
    /// Expected `iss`, if any.
    pub issuer: Option<String>,
    /// Expected `aud`, if any.
    pub audience: Option<String>,
    /// Clock skew tolerance in seconds.
    pub leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            issuer: None,
            audience: None,
            leeway_secs: 0,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }
}

/// Claims read from admin tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

/// The `aud` claim: a single audience or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

/// `TokenVerifier` backed by an HS256 shared secret.
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = config.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);

        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.expose_secret().as_bytes()),
            validation,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<AdminClaims, Fault> {
        decode::<AdminClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    Fault::token(codes::token::EXPIRED, "Token has expired")
                }
                ErrorKind::ImmatureSignature => {
                    tracing::debug!("Token used before nbf");
                    Fault::token(codes::token::NOT_ACTIVE, "Token is not active yet")
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    Fault::token(codes::token::INVALID, "Token issuer is not accepted")
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("Invalid audience in token");
                    Fault::token(codes::token::INVALID, "Token audience is not accepted")
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
                    Fault::token(codes::token::INVALID, format!("Token is invalid: {}", e))
                }
            })
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AdminPrincipal, Fault> {
        let claims = self.decode_claims(token)?;

        let uid = UserId::new(claims.sub).map_err(|e| {
            Fault::token(codes::token::INVALID, format!("Token subject is invalid: {}", e))
        })?;

        Ok(AdminPrincipal::new(uid, claims.email, claims.admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-signing-secret";

    fn config() -> JwtConfig {
        JwtConfig::new(SecretString::new(SECRET.to_string()))
    }

    fn claims(exp_offset: i64) -> AdminClaims {
        let now = Timestamp::now().as_unix_secs() as i64;
        AdminClaims {
            sub: "admin-1".to_string(),
            exp: (now + exp_offset) as u64,
            nbf: None,
            iat: Some(now as u64),
            jti: Some("jti-1".to_string()),
            iss: None,
            aud: None,
            email: Some("admin@example.com".to_string()),
            admin: true,
        }
    }

    fn sign(claims: &AdminClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn code_of(result: Result<AdminPrincipal, Fault>) -> String {
        result.unwrap_err().source_code().unwrap().to_string()
    }

    #[tokio::test]
    async fn valid_token_yields_principal() {
        let verifier = JwtTokenVerifier::new(&config());
        let principal = verifier.verify(&sign(&claims(600), SECRET)).await.unwrap();

        assert_eq!(principal.uid.as_str(), "admin-1");
        assert!(principal.admin);
    }

    #[tokio::test]
    async fn expired_token_is_expired_fault() {
        let verifier = JwtTokenVerifier::new(&config());
        let result = verifier.verify(&sign(&claims(-600), SECRET)).await;

        assert_eq!(code_of(result), codes::token::EXPIRED);
    }

    #[tokio::test]
    async fn future_nbf_is_not_active_fault() {
        let verifier = JwtTokenVerifier::new(&config());
        let mut early = claims(1200);
        early.nbf = Some(Timestamp::now().as_unix_secs() + 600);

        let result = verifier.verify(&sign(&early, SECRET)).await;
        assert_eq!(code_of(result), codes::token::NOT_ACTIVE);
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid_fault() {
        let verifier = JwtTokenVerifier::new(&config());
        let result = verifier.verify(&sign(&claims(600), "other-secret")).await;

        assert_eq!(code_of(result), codes::token::INVALID);
    }

    #[tokio::test]
    async fn garbage_is_invalid_fault() {
        let verifier = JwtTokenVerifier::new(&config());
        assert_eq!(code_of(verifier.verify("not.a.jwt").await), codes::token::INVALID);
    }

    #[tokio::test]
    async fn wrong_issuer_is_rejected() {
        let verifier = JwtTokenVerifier::new(&config().with_issuer("https://issuer.example"));
        let mut other = claims(600);
        other.iss = Some("https://elsewhere.example".to_string());

        assert_eq!(code_of(verifier.verify(&sign(&other, SECRET)).await), codes::token::INVALID);
    }

    #[tokio::test]
    async fn audience_is_checked_when_configured() {
        let verifier = JwtTokenVerifier::new(&config().with_audience("baas-admin"));
        let mut good = claims(600);
        good.aud = Some(Audience::One("baas-admin".to_string()));

        assert!(verifier.verify(&sign(&good, SECRET)).await.is_ok());
        assert!(verifier.verify(&sign(&claims(600), SECRET)).await.is_err());
    }

    #[tokio::test]
    async fn audience_list_is_accepted() {
        let verifier = JwtTokenVerifier::new(&config().with_audience("baas-admin"));
        let mut listed = claims(600);
        listed.aud = Some(Audience::Many(vec![
            "dashboard".to_string(),
            "baas-admin".to_string(),
        ]));

        let principal = verifier.verify(&sign(&listed, SECRET)).await.unwrap();
        assert_eq!(principal.uid.as_str(), "admin-1");

        listed.aud = Some(Audience::Many(vec!["dashboard".to_string()]));
        assert_eq!(code_of(verifier.verify(&sign(&listed, SECRET)).await), codes::token::INVALID);
    }

    #[tokio::test]
    async fn audience_list_decodes_without_configured_audience() {
        let verifier = JwtTokenVerifier::new(&config());
        let mut listed = claims(600);
        listed.aud = Some(Audience::Many(vec!["a".to_string(), "b".to_string()]));

        assert!(verifier.verify(&sign(&listed, SECRET)).await.is_ok());
    }

    #[test]
    fn audience_claim_accepts_string_or_array() {
        let one: Audience = serde_json::from_value(serde_json::json!("x")).unwrap();
        let many: Audience = serde_json::from_value(serde_json::json!(["x", "y"])).unwrap();

        assert_eq!(one, Audience::One("x".to_string()));
        assert_eq!(many, Audience::Many(vec!["x".to_string(), "y".to_string()]));
    }
}
