//! WebSocket upgrade handler for live collection updates.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Verify the admin token (query `token` or `Authorization` header)
//! 2. Upgrade to WebSocket and register with the fan-out
//! 3. Apply subscribe / unsubscribe requests
//! 4. Drain the connection's queue to the socket, each write bounded by
//!    the delivery timeout
//! 5. Unregister on disconnect, write failure or timeout

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::adapters::http::error::FaultResponse;
use crate::adapters::http::extract::QueryParams;
use crate::adapters::http::middleware::bearer_token;
use crate::domain::fault::{codes, Fault};
use crate::domain::foundation::{AdminPrincipal, ConnectionId, FieldError, Topic};
use crate::domain::normalizer::ErrorNormalizer;
use crate::ports::TokenVerifier;

use super::fanout::{FanOut, SubscribeOutcome, Subscriber};
use super::messages::{ClientMessage, ServerMessage};

/// Replies to client requests queued ahead of the socket.
const REPLY_BUFFER: usize = 16;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub fanout: Arc<FanOut>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub normalizer: ErrorNormalizer,
    pub delivery_timeout: Duration,
}

impl WebSocketState {
    pub fn new(
        fanout: Arc<FanOut>,
        verifier: Arc<dyn TokenVerifier>,
        normalizer: ErrorNormalizer,
        delivery_timeout: Duration,
    ) -> Self {
        Self {
            fanout,
            verifier,
            normalizer,
            delivery_timeout,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    pub token: Option<String>,
}

/// Why a socket write did not complete.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("message could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("socket write failed: {0}")]
    Socket(#[from] axum::Error),

    #[error("socket write did not complete within {0:?}")]
    TimedOut(Duration),
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
///
/// The token is checked before the upgrade itself, so an unauthenticated
/// client gets the token fault rather than an upgrade rejection.
pub async fn ws_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<WebSocketState>,
    QueryParams(params): QueryParams<ConnectParams>,
    headers: HeaderMap,
) -> Result<Response, FaultResponse> {
    let token = params
        .token
        .as_deref()
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(bearer_token)
        })
        .ok_or_else(|| Fault::token(codes::token::MISSING, "Authorization token is missing"))?;

    let principal = state.verifier.verify(token).await?;

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, principal)))
}

/// Runs for the lifetime of one connection.
async fn handle_socket(socket: WebSocket, state: WebSocketState, principal: AdminPrincipal) {
    let (mut sink, mut stream) = socket.split();
    let Subscriber {
        connection_id,
        mut events,
    } = state.fanout.connect().await;
    let delivery_timeout = state.delivery_timeout;

    tracing::info!(connection_id = %connection_id, uid = %principal.uid, "Socket connected");

    if let Err(e) = send_message(
        &mut sink,
        &ServerMessage::connected(connection_id),
        delivery_timeout,
    )
    .await
    {
        tracing::debug!(connection_id = %connection_id, "Failed to send connected message: {}", e);
        state.fanout.on_connection_closed(&connection_id).await;
        return;
    }

    let (reply_tx, mut reply_rx) = mpsc::channel::<ServerMessage>(REPLY_BUFFER);

    // Dispatch: queued change events and request replies → socket
    let mut send_task = tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                Some(event) = events.recv() => ServerMessage::Change(event),
                Some(reply) = reply_rx.recv() => reply,
                else => break,
            };
            if let Err(e) = send_message(&mut sink, &message, delivery_timeout).await {
                tracing::debug!(
                    connection_id = %connection_id,
                    "Delivery failed, closing connection: {}",
                    e
                );
                break;
            }
        }
    });

    // Client requests → fan-out
    let fanout = state.fanout.clone();
    let normalizer = state.normalizer;
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            let reply = match result {
                Ok(Message::Text(text)) => {
                    dispatch_client_message(&fanout, connection_id, &text, &normalizer).await
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        "Received unsupported binary message"
                    );
                    invalid_message(&normalizer, "Binary messages are not supported")
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_id, "Client sent close frame");
                    break;
                }
                // Protocol pings are answered by axum
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, "Receive error: {}", e);
                    break;
                }
            };
            if reply_tx.send(reply).await.is_err() {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    let removed = state.fanout.on_connection_closed(&connection_id).await;
    tracing::info!(connection_id = %connection_id, subscriptions = removed, "Socket disconnected");
}

/// Applies one client request and returns the reply to send.
pub async fn dispatch_client_message(
    fanout: &FanOut,
    connection_id: ConnectionId,
    text: &str,
    normalizer: &ErrorNormalizer,
) -> ServerMessage {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => return invalid_message(normalizer, format!("Unrecognised message: {}", e)),
    };

    match message {
        ClientMessage::Ping => ServerMessage::pong(),
        ClientMessage::SubscribeToCollection { collection } => {
            let topic = match parse_topic(&collection) {
                Ok(topic) => topic,
                Err(fault) => return ServerMessage::error(normalizer.normalize(&fault)),
            };
            match fanout.subscribe(&connection_id, topic).await {
                SubscribeOutcome::Subscribed | SubscribeOutcome::AlreadySubscribed => {
                    ServerMessage::subscribed(collection)
                }
                SubscribeOutcome::UnknownConnection => ServerMessage::error(
                    normalizer.normalize(&Fault::generic("Connection is no longer registered")),
                ),
            }
        }
        ClientMessage::UnsubscribeFromCollection { collection } => {
            match parse_topic(&collection) {
                Ok(topic) => {
                    fanout.unsubscribe(&connection_id, &topic).await;
                    ServerMessage::unsubscribed(collection)
                }
                Err(fault) => ServerMessage::error(normalizer.normalize(&fault)),
            }
        }
    }
}

fn parse_topic(collection: &str) -> Result<Topic, Fault> {
    Topic::new(collection).map_err(|e| Fault::from(e.with_value(collection)))
}

fn invalid_message(normalizer: &ErrorNormalizer, reason: impl Into<String>) -> ServerMessage {
    let fault = Fault::from(FieldError::new("message", reason, Value::Null));
    ServerMessage::error(normalizer.normalize(&fault))
}

/// Send a JSON message, giving up after `timeout`.
async fn send_message(
    sink: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
    timeout: Duration,
) -> Result<(), DeliveryError> {
    let json = serde_json::to_string(msg)?;
    tokio::time::timeout(timeout, sink.send(Message::Text(json)))
        .await
        .map_err(|_| DeliveryError::TimedOut(timeout))??;
    Ok(())
}

/// Router for the live-update endpoint.
pub fn websocket_router(state: WebSocketState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::change::ChangeEvent;
    use serde_json::json;

    async fn connected() -> (FanOut, Subscriber) {
        let fanout = FanOut::with_default_capacity();
        let sub = fanout.connect().await;
        (fanout, sub)
    }

    fn to_json(message: &ServerMessage) -> Value {
        serde_json::to_value(message).unwrap()
    }

    #[tokio::test]
    async fn subscribe_request_registers_topic() {
        let (fanout, sub) = connected().await;
        let reply = dispatch_client_message(
            &fanout,
            sub.connection_id,
            r#"{"type":"subscribe-to-collection","collection":"users"}"#,
            &ErrorNormalizer::production(),
        )
        .await;

        assert_eq!(to_json(&reply)["type"], "subscribed");
        assert!(
            fanout
                .is_subscribed(&sub.connection_id, &Topic::new("users").unwrap())
                .await
        );
    }

    #[tokio::test]
    async fn subscribed_connection_receives_published_change() {
        let (fanout, mut sub) = connected().await;
        dispatch_client_message(
            &fanout,
            sub.connection_id,
            r#"{"type":"subscribe-to-collection","collection":"messages"}"#,
            &ErrorNormalizer::production(),
        )
        .await;

        fanout
            .publish(ChangeEvent::created(
                Topic::new("messages").unwrap(),
                "m1",
                json!({"text": "hi"}),
            ))
            .await;

        let event = sub.events.recv().await.unwrap();
        let wire = to_json(&ServerMessage::Change(event));
        assert_eq!(wire["type"], "change");
        assert_eq!(wire["operationKind"], "created");
    }

    #[tokio::test]
    async fn unsubscribe_request_is_acknowledged_even_when_not_subscribed() {
        let (fanout, sub) = connected().await;
        let reply = dispatch_client_message(
            &fanout,
            sub.connection_id,
            r#"{"type":"unsubscribe-from-collection","collection":"users"}"#,
            &ErrorNormalizer::production(),
        )
        .await;

        assert_eq!(to_json(&reply)["type"], "unsubscribed");
    }

    #[tokio::test]
    async fn invalid_collection_name_is_validation_error() {
        let (fanout, sub) = connected().await;
        let reply = dispatch_client_message(
            &fanout,
            sub.connection_id,
            r#"{"type":"subscribe-to-collection","collection":"a/b"}"#,
            &ErrorNormalizer::production(),
        )
        .await;

        let json = to_json(&reply);
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "validation-error");
        assert_eq!(json["statusCode"], 400);
        assert_eq!(json["details"]["errors"][0]["value"], "a/b");
        assert!(fanout.active_topics().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_message_is_error_reply() {
        let (fanout, sub) = connected().await;
        let reply = dispatch_client_message(
            &fanout,
            sub.connection_id,
            "{\"type\":\"dance\"}",
            &ErrorNormalizer::production(),
        )
        .await;

        assert_eq!(to_json(&reply)["code"], "validation-error");
    }

    #[tokio::test]
    async fn ping_gets_pong() {
        let (fanout, sub) = connected().await;
        let reply = dispatch_client_message(
            &fanout,
            sub.connection_id,
            r#"{"type":"ping"}"#,
            &ErrorNormalizer::production(),
        )
        .await;

        assert_eq!(to_json(&reply)["type"], "pong");
    }
}
