//! The single error-normalization boundary of the HTTP surface.
//!
//! Handlers return `Result<_, FaultResponse>`. A `FaultResponse` does not
//! render anything itself; it stashes the [`Fault`] in the response
//! extensions and [`normalize_errors`] turns it into the failure envelope:
//!
//! ```text
//! handler ─► Err(FaultResponse) ─► extensions[Fault]
//!                                       │
//!            normalize_errors ◄─────────┘
//!              ├─ ErrorNormalizer::normalize
//!              ├─ log at warn (4xx) or error (5xx)
//!              └─ { success: false, error: { ..., timestamp, path, method } }
//! ```
//!
//! Error responses produced by the framework itself (unmatched route,
//! method not allowed, timeouts, body limits) carry no fault and are wrapped
//! in the same envelope using their status.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::fault::Fault;
use crate::domain::foundation::{FieldError, Timestamp, ValidationError};
use crate::domain::normalizer::{ErrorNormalizer, NormalizedError, Severity};

// ════════════════════════════════════════════════════════════════════════════
// Handler-side error
// ════════════════════════════════════════════════════════════════════════════

/// Error returned by handlers; rendered by [`normalize_errors`].
#[derive(Debug)]
pub struct FaultResponse(pub Fault);

impl FaultResponse {
    /// Validation failure for a single field with the rejected value.
    pub fn invalid(error: ValidationError, value: impl Into<Value>) -> Self {
        Self(Fault::from(error.with_value(value)))
    }
}

impl From<Fault> for FaultResponse {
    fn from(fault: Fault) -> Self {
        Self(fault)
    }
}

impl From<FieldError> for FaultResponse {
    fn from(error: FieldError) -> Self {
        Self(Fault::from(error))
    }
}

impl IntoResponse for FaultResponse {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self.0);
        response
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Failure envelope
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub error: FailureBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureBody {
    #[serde(flatten)]
    pub error: NormalizedError,
    pub timestamp: String,
    pub path: String,
    pub method: String,
}

impl FailureEnvelope {
    pub fn new(error: NormalizedError, path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            success: false,
            error: FailureBody {
                error,
                timestamp: Timestamp::now().to_rfc3339(),
                path: path.into(),
                method: method.into(),
            },
        }
    }
}

impl IntoResponse for FailureEnvelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.error.http_status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Middleware
// ════════════════════════════════════════════════════════════════════════════

/// Normalizes every failed response into the failure envelope.
pub async fn normalize_errors(
    State(normalizer): State<ErrorNormalizer>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let method = request.method().to_string();

    let mut response = next.run(request).await;

    let normalized = match response.extensions_mut().remove::<Fault>() {
        Some(fault) => {
            let normalized = normalizer.normalize(&fault);
            log_fault(&fault, &normalized, &path, &method);
            normalized
        }
        None if is_bare_framework_error(&response) => {
            let normalized = from_status(response.status());
            tracing::warn!(
                code = %normalized.code,
                status = normalized.http_status,
                path = %path,
                method = %method,
                "Request rejected"
            );
            normalized
        }
        None => return response,
    };

    let mut envelope = FailureEnvelope::new(normalized, path, method).into_response();
    carry_headers(&response, &mut envelope);
    envelope
}

/// Keeps headers set by inner layers (CORS, tracing) on the rebuilt response.
fn carry_headers(from: &Response, to: &mut Response) {
    for (name, value) in from.headers() {
        if name == header::CONTENT_TYPE || name == header::CONTENT_LENGTH {
            continue;
        }
        to.headers_mut().append(name.clone(), value.clone());
    }
}

fn log_fault(fault: &Fault, normalized: &NormalizedError, path: &str, method: &str) {
    match normalized.severity() {
        Severity::Warning => tracing::warn!(
            code = %normalized.code,
            status = normalized.http_status,
            path = %path,
            method = %method,
            fault = %fault,
            "Request failed"
        ),
        Severity::Error => tracing::error!(
            code = %normalized.code,
            status = normalized.http_status,
            path = %path,
            method = %method,
            fault = %fault,
            "Request failed"
        ),
    }
}

/// Error statuses that did not come from a handler and are not JSON yet.
fn is_bare_framework_error(response: &Response) -> bool {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return false;
    }
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);
    !is_json
}

fn from_status(status: StatusCode) -> NormalizedError {
    let reason = status.canonical_reason().unwrap_or("Request failed");
    NormalizedError {
        message: reason.to_string(),
        code: reason.to_ascii_lowercase().replace([' ', '\''], "-"),
        http_status: status.as_u16(),
        details: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn app(normalizer: ErrorNormalizer) -> Router {
        Router::new()
            .route(
                "/missing",
                get(|| async {
                    Err::<(), _>(FaultResponse(Fault::identity(
                        "user-not-found",
                        "There is no user record",
                    )))
                }),
            )
            .route(
                "/boom",
                get(|| async {
                    Err::<(), _>(FaultResponse(Fault::generic("pool exhausted at 10.0.0.3")))
                }),
            )
            .route("/ok", get(|| async { "fine" }))
            .route(
                "/tagged",
                get(|| async {
                    let mut response = FaultResponse(Fault::generic("tagged")).into_response();
                    response
                        .headers_mut()
                        .insert("x-request-id", header::HeaderValue::from_static("req-7"));
                    response
                }),
            )
            .layer(middleware::from_fn_with_state(normalizer, normalize_errors))
    }

    fn get_request(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn fault_becomes_failure_envelope() {
        let response = app(ErrorNormalizer::production())
            .oneshot(get_request("/missing"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "user-not-found");
        assert_eq!(json["error"]["statusCode"], 404);
        assert_eq!(json["error"]["path"], "/missing");
        assert_eq!(json["error"]["method"], "GET");
        assert!(json["error"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn production_hides_server_error_message() {
        let response = app(ErrorNormalizer::production())
            .oneshot(get_request("/boom"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Internal server error");
        assert!(json["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn diagnostic_mode_keeps_upstream_message() {
        let response = app(ErrorNormalizer::diagnostic())
            .oneshot(get_request("/boom"))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "pool exhausted at 10.0.0.3");
        assert!(json["error"]["details"].is_object());
    }

    #[tokio::test]
    async fn unmatched_route_is_wrapped() {
        let response = app(ErrorNormalizer::production())
            .oneshot(get_request("/nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "not-found");
        assert_eq!(json["error"]["statusCode"], 404);
    }

    #[tokio::test]
    async fn success_passes_through_untouched() {
        let response = app(ErrorNormalizer::production())
            .oneshot(get_request("/ok"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn envelope_keeps_inner_headers() {
        let response = app(ErrorNormalizer::production())
            .oneshot(get_request("/tagged"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["x-request-id"], "req-7");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }

    #[test]
    fn status_codes_become_kebab_case() {
        assert_eq!(from_status(StatusCode::METHOD_NOT_ALLOWED).code, "method-not-allowed");
        assert_eq!(from_status(StatusCode::PAYLOAD_TOO_LARGE).code, "payload-too-large");
    }
}
