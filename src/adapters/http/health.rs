//! Liveness endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};
use serde::Serialize;

use crate::adapters::http::envelope::ApiResponse;
use crate::adapters::websocket::FanOut;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub connections: usize,
    pub active_topics: usize,
}

/// GET /health
pub async fn health(State(fanout): State<Arc<FanOut>>) -> ApiResponse<HealthResponse> {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        connections: fanout.connection_count().await,
        active_topics: fanout.active_topics().await.len(),
    })
}

pub fn health_routes(fanout: Arc<FanOut>) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(fanout)
}
