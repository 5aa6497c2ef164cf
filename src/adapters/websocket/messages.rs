//! WebSocket message types for live collection updates.
//!
//! Defines the protocol between server and connected clients:
//! - Server → Client: connection status, subscription acks, changes, errors
//! - Client → Server: subscribe, unsubscribe, pings

use serde::{Deserialize, Serialize};

use crate::domain::change::ChangeEvent;
use crate::domain::foundation::Timestamp;
use crate::domain::normalizer::NormalizedError;

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Connection established successfully.
    Connected(ConnectedMessage),

    /// Subscription acknowledged.
    Subscribed(SubscriptionMessage),

    Unsubscribed(SubscriptionMessage),

    /// A committed mutation in a subscribed collection.
    Change(ChangeEvent),

    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub connection_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionMessage {
    pub collection: String,
}

/// Error sent to the client, shaped like the HTTP failure body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: String,
}

impl From<NormalizedError> for ErrorMessage {
    fn from(error: NormalizedError) -> Self {
        Self {
            code: error.code,
            message: error.message,
            status_code: error.http_status,
            details: error.details,
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

impl ServerMessage {
    pub fn connected(connection_id: impl ToString) -> Self {
        ServerMessage::Connected(ConnectedMessage {
            connection_id: connection_id.to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn subscribed(collection: impl Into<String>) -> Self {
        ServerMessage::Subscribed(SubscriptionMessage {
            collection: collection.into(),
        })
    }

    pub fn unsubscribed(collection: impl Into<String>) -> Self {
        ServerMessage::Unsubscribed(SubscriptionMessage {
            collection: collection.into(),
        })
    }

    pub fn error(error: NormalizedError) -> Self {
        ServerMessage::Error(error.into())
    }

    pub fn pong() -> Self {
        ServerMessage::Pong(PongMessage {
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,

    SubscribeToCollection { collection: String },

    UnsubscribeFromCollection { collection: String },
}
