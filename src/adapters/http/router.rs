//! Assembles the full HTTP surface.
//!
//! ```text
//! normalize_errors            (every failure leaves as the failure envelope)
//!   └─ trace ─ cors ─ timeout
//!        ├─ /health
//!        ├─ /ws                                     token via query or header
//!        ├─ /api/storage/download/*path             signed URL, no bearer
//!        └─ auth_middleware
//!             ├─ /api/collections/:collection/documents[/:id]
//!             ├─ /api/users[/:uid[/claims]]
//!             └─ /api/storage/{upload,files,signed-url}
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderValue, Method},
    middleware, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapters::http::documents::{document_routes, DocumentHandlers};
use crate::adapters::http::error::normalize_errors;
use crate::adapters::http::health::health_routes;
use crate::adapters::http::middleware::{auth_middleware, AuthState};
use crate::adapters::http::storage::{download_routes, storage_routes, StorageHandlers};
use crate::adapters::http::users::{user_routes, UserHandlers};
use crate::adapters::memory::InMemoryObjectStorage;
use crate::adapters::websocket::{websocket_router, FanOut, WebSocketState};
use crate::config::{AppConfig, UploadConfig};
use crate::domain::normalizer::ErrorNormalizer;
use crate::ports::{DocumentStore, IdentityProvider, TokenVerifier};

/// Backend adapters and shared services the routes are built from.
#[derive(Clone)]
pub struct AppComponents {
    pub documents: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub storage: Arc<InMemoryObjectStorage>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub fanout: Arc<FanOut>,
}

/// Tunables applied while assembling the router.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub normalizer: ErrorNormalizer,
    pub upload: UploadConfig,
    pub signed_url_ttl: Duration,
    pub delivery_timeout: Duration,
    pub request_timeout: Duration,
    /// Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl RouterSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            normalizer: ErrorNormalizer::new(config.is_production()),
            upload: config.upload.clone(),
            signed_url_ttl: config.storage.signed_url_ttl(),
            delivery_timeout: config.realtime.delivery_timeout(),
            request_timeout: config.server.request_timeout(),
            cors_origins: config.server.cors_origins_list(),
        }
    }
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            normalizer: ErrorNormalizer::production(),
            upload: UploadConfig::default(),
            signed_url_ttl: Duration::from_secs(900),
            delivery_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

pub fn build_router(components: AppComponents, settings: RouterSettings) -> Router {
    let auth_state: AuthState = components.verifier.clone();

    let api = Router::new()
        .nest(
            "/collections",
            document_routes(DocumentHandlers::new(
                components.documents.clone(),
                components.fanout.clone(),
            )),
        )
        .nest("/users", user_routes(UserHandlers::new(components.identity.clone())))
        .nest(
            "/storage",
            storage_routes(StorageHandlers::new(
                components.storage.clone(),
                settings.upload.clone(),
                settings.signed_url_ttl,
            )),
        )
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let socket = websocket_router(WebSocketState::new(
        components.fanout.clone(),
        components.verifier.clone(),
        settings.normalizer,
        settings.delivery_timeout,
    ));

    Router::new()
        .merge(health_routes(components.fanout.clone()))
        .merge(socket)
        .nest("/api/storage/download", download_routes(components.storage.clone()))
        .nest("/api", api)
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(
            settings.normalizer,
            normalize_errors,
        ))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
