//! WebSocket adapters for live collection updates.
//!
//! Pushes committed document changes to connected admin dashboards.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              Document command handlers (create/update/delete)        │
//! │                  persist first, then ChangePublisher::publish         │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                            FanOut                                    │
//! │   Topic: users         Topic: posts          Topic: messages         │
//! │   ├── conn-a           ├── conn-a            └── conn-d              │
//! │   └── conn-b           └── conn-c                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │ try_send into per-connection queue
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │        per-connection dispatch task → socket (delivery timeout)      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`fanout`] - Topic registry and non-blocking publish
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod fanout;
pub mod handler;
pub mod messages;

pub use fanout::{FanOut, SubscribeOutcome, Subscriber, DEFAULT_QUEUE_CAPACITY};
pub use handler::{dispatch_client_message, websocket_router, ws_handler, WebSocketState};
pub use messages::{ClientMessage, ServerMessage};
