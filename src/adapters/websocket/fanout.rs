//! Topic-based fan-out of change events to socket connections.
//!
//! Each collection is a topic. Connections subscribe to any number of
//! topics and receive every event published to them afterwards.
//!
//! # Architecture
//!
//! ```text
//! Topic: users         Topic: posts
//! ├── conn-a           ├── conn-a
//! └── conn-b           └── conn-c
//!
//! conn-a ──► bounded queue ──► dispatch task ──► socket
//! ```
//!
//! `publish` snapshots the subscriber set under a read guard, releases it,
//! and then hands the event to each connection's queue with `try_send`.
//! A full queue drops the event for that connection only; the publisher is
//! never blocked by a slow socket.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};

use crate::domain::change::ChangeEvent;
use crate::domain::foundation::{ConnectionId, Topic};
use crate::ports::ChangePublisher;

/// Default per-connection queue length.
pub const DEFAULT_QUEUE_CAPACITY: usize = 128;

/// Receiving end handed to a newly registered connection.
pub struct Subscriber {
    pub connection_id: ConnectionId,
    pub events: mpsc::Receiver<ChangeEvent>,
}

/// Result of a subscribe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
    UnknownConnection,
}

struct Connection {
    sender: mpsc::Sender<ChangeEvent>,
    topics: HashSet<Topic>,
}

#[derive(Default)]
struct Registry {
    /// topic → connections; empty sets are removed eagerly.
    topics: HashMap<Topic, HashSet<ConnectionId>>,
    connections: HashMap<ConnectionId, Connection>,
}

/// Owner of the topic → subscriber registry.
///
/// # Thread Safety
///
/// Uses `RwLock` for the registry since publishes (reads) vastly outnumber
/// subscription changes (writes). No await point and no socket I/O happens
/// while a guard is held.
pub struct FanOut {
    registry: RwLock<Registry>,
    queue_capacity: usize,
}

impl FanOut {
    /// Create a fan-out whose connections buffer up to `queue_capacity`
    /// undelivered events each.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }

    /// Register a new connection and return its event queue.
    pub async fn connect(&self) -> Subscriber {
        let connection_id = ConnectionId::new();
        let (sender, events) = mpsc::channel(self.queue_capacity);

        self.registry.write().await.connections.insert(
            connection_id,
            Connection {
                sender,
                topics: HashSet::new(),
            },
        );
        tracing::debug!(connection_id = %connection_id, "Connection registered");

        Subscriber {
            connection_id,
            events,
        }
    }

    /// Subscribe a connection to a topic. Idempotent.
    pub async fn subscribe(&self, connection_id: &ConnectionId, topic: Topic) -> SubscribeOutcome {
        let mut registry = self.registry.write().await;

        let Some(connection) = registry.connections.get_mut(connection_id) else {
            tracing::warn!(
                connection_id = %connection_id,
                topic = %topic,
                "Subscribe from unknown connection ignored"
            );
            return SubscribeOutcome::UnknownConnection;
        };

        if !connection.topics.insert(topic.clone()) {
            return SubscribeOutcome::AlreadySubscribed;
        }

        registry
            .topics
            .entry(topic.clone())
            .or_default()
            .insert(*connection_id);
        tracing::debug!(connection_id = %connection_id, topic = %topic, "Subscribed");

        SubscribeOutcome::Subscribed
    }

    /// Remove a subscription. Returns `false` when there was none.
    pub async fn unsubscribe(&self, connection_id: &ConnectionId, topic: &Topic) -> bool {
        let mut registry = self.registry.write().await;

        let removed = registry
            .connections
            .get_mut(connection_id)
            .map(|c| c.topics.remove(topic))
            .unwrap_or(false);

        if removed {
            remove_from_topic(&mut registry.topics, topic, connection_id);
            tracing::debug!(connection_id = %connection_id, topic = %topic, "Unsubscribed");
        }
        removed
    }

    /// Drop every subscription of a connection and its queue.
    ///
    /// Safe to call any number of times; returns how many subscriptions
    /// were removed by this call.
    pub async fn on_connection_closed(&self, connection_id: &ConnectionId) -> usize {
        let mut registry = self.registry.write().await;

        let Some(connection) = registry.connections.remove(connection_id) else {
            return 0;
        };
        for topic in &connection.topics {
            remove_from_topic(&mut registry.topics, topic, connection_id);
        }
        tracing::debug!(
            connection_id = %connection_id,
            subscriptions = connection.topics.len(),
            "Connection closed"
        );

        connection.topics.len()
    }

    /// Hand `event` to every connection subscribed to its topic right now.
    ///
    /// Returns the number of queues that accepted the event. Connections
    /// whose queue is full or closed are skipped and logged.
    pub async fn publish(&self, event: ChangeEvent) -> usize {
        let targets: Vec<(ConnectionId, mpsc::Sender<ChangeEvent>)> = {
            let registry = self.registry.read().await;
            match registry.topics.get(&event.topic) {
                Some(ids) => ids
                    .iter()
                    .filter_map(|id| {
                        registry
                            .connections
                            .get(id)
                            .map(|c| (*id, c.sender.clone()))
                    })
                    .collect(),
                None => Vec::new(),
            }
        };

        let mut delivered = 0;
        for (connection_id, sender) in targets {
            match sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        topic = %event.topic,
                        "Subscriber queue full, dropping change event"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        topic = %event.topic,
                        "Subscriber gone before delivery"
                    );
                }
            }
        }

        tracing::trace!(
            topic = %event.topic,
            operation = event.operation_kind.as_str(),
            resource_id = %event.resource_id,
            delivered,
            "Change event published"
        );
        delivered
    }

    /// Number of connections subscribed to `topic`.
    pub async fn subscriber_count(&self, topic: &Topic) -> usize {
        self.registry
            .read()
            .await
            .topics
            .get(topic)
            .map(HashSet::len)
            .unwrap_or(0)
    }

    pub async fn is_subscribed(&self, connection_id: &ConnectionId, topic: &Topic) -> bool {
        self.registry
            .read()
            .await
            .connections
            .get(connection_id)
            .map(|c| c.topics.contains(topic))
            .unwrap_or(false)
    }

    /// Topics with at least one subscriber.
    pub async fn active_topics(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self.registry.read().await.topics.keys().cloned().collect();
        topics.sort();
        topics
    }

    pub async fn connection_count(&self) -> usize {
        self.registry.read().await.connections.len()
    }
}

impl Default for FanOut {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl ChangePublisher for FanOut {
    async fn publish(&self, event: ChangeEvent) -> usize {
        FanOut::publish(self, event).await
    }
}

fn remove_from_topic(
    topics: &mut HashMap<Topic, HashSet<ConnectionId>>,
    topic: &Topic,
    connection_id: &ConnectionId,
) {
    if let Some(ids) = topics.get_mut(topic) {
        ids.remove(connection_id);
        if ids.is_empty() {
            topics.remove(topic);
        }
    }
}
