//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that verifies Bearer tokens and injects the principal
//! - `RequireAuth` - Extractor for handlers that need the caller
//!
//! # Architecture
//!
//! The middleware uses the `TokenVerifier` port, keeping it provider-agnostic.
//! Whether the JWT adapter or the mock is wired in, the middleware doesn't change.
//!
//! ```text
//! Request → auth_middleware → injects AdminPrincipal into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! Every failure is a token fault, so it leaves through the normalizer like
//! any other error.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::adapters::http::error::FaultResponse;
use crate::domain::fault::{codes, Fault};
use crate::domain::foundation::AdminPrincipal;
use crate::ports::TokenVerifier;

/// Auth middleware state - wraps the token verifier.
pub type AuthState = Arc<dyn TokenVerifier>;

/// Authentication middleware that verifies Bearer tokens.
///
/// Expects the token in the `Authorization` header:
/// ```text
/// Authorization: Bearer <token>
/// ```
pub async fn auth_middleware(
    State(verifier): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, FaultResponse> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(missing_token)?;

    let principal = verifier.verify(token).await?;
    tracing::debug!(uid = %principal.uid, "Admin request authenticated");

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Token part of an `Authorization` header value.
pub fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn missing_token() -> FaultResponse {
    Fault::token(codes::token::MISSING, "Authorization token is missing").into()
}

/// Extractor that requires an authenticated caller.
///
/// # Example
///
/// ```ignore
/// async fn my_handler(RequireAuth(admin): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", admin.label())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AdminPrincipal);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = FaultResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminPrincipal>()
            .cloned()
            .map(RequireAuth)
            .ok_or_else(missing_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockTokenVerifier;
    use crate::domain::fault::FaultKind;
    use crate::domain::foundation::UserId;
    use axum::body::Body;

    fn admin() -> AdminPrincipal {
        AdminPrincipal::new(
            UserId::new("admin-1").unwrap(),
            Some("admin@example.com".to_string()),
            true,
        )
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Token Extraction
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer my-token"), Some("my-token"));
        assert_eq!(bearer_token("my-token"), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer   "), None);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // RequireAuth Extractor
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn require_auth_extracts_principal_from_extensions() {
        let mut request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        request.extensions_mut().insert(admin());
        let (mut parts, _body) = request.into_parts();

        let RequireAuth(principal) = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(principal.label(), "admin@example.com");
    }

    #[tokio::test]
    async fn require_auth_fails_with_missing_token_fault() {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let (mut parts, _body) = request.into_parts();

        let Err(FaultResponse(fault)) = RequireAuth::from_request_parts(&mut parts, &()).await
        else {
            panic!("expected rejection");
        };
        assert_eq!(fault.kind, FaultKind::Token);
        assert_eq!(fault.source_code(), Some(codes::token::MISSING));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Middleware
    // ════════════════════════════════════════════════════════════════════════════

    mod middleware_flow {
        use super::*;
        use axum::{http::StatusCode, middleware, routing::get, Router};
        use tower::ServiceExt;

        fn app() -> Router {
            let verifier: AuthState =
                Arc::new(MockTokenVerifier::new().with_principal("good-token", admin()));
            Router::new()
                .route(
                    "/me",
                    get(|RequireAuth(p): RequireAuth| async move { p.uid.to_string() }),
                )
                .layer(middleware::from_fn_with_state(verifier, auth_middleware))
        }

        #[tokio::test]
        async fn valid_token_reaches_handler() {
            let request = Request::builder()
                .uri("/me")
                .header("Authorization", "Bearer good-token")
                .body(Body::empty())
                .unwrap();

            let response = app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn missing_header_is_token_fault() {
            let request = Request::builder().uri("/me").body(Body::empty()).unwrap();

            let response = app().oneshot(request).await.unwrap();
            let fault = response.extensions().get::<Fault>().unwrap();
            assert_eq!(fault.source_code(), Some(codes::token::MISSING));
        }

        #[tokio::test]
        async fn unknown_token_is_invalid_token_fault() {
            let request = Request::builder()
                .uri("/me")
                .header("Authorization", "Bearer forged")
                .body(Body::empty())
                .unwrap();

            let response = app().oneshot(request).await.unwrap();
            let fault = response.extensions().get::<Fault>().unwrap();
            assert_eq!(fault.source_code(), Some(codes::token::INVALID));
        }
    }
}
