//! Integration tests for topic-based change fan-out.
//!
//! These tests exercise `FanOut` through its public API and the
//! `ChangePublisher` port the document handlers depend on.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;

use baas_admin::adapters::http::documents::DocumentHandlers;
use baas_admin::adapters::websocket::{FanOut, SubscribeOutcome};
use baas_admin::application::handlers::{
    CreateDocumentCommand, CreateDocumentHandler, DeleteDocumentCommand, DeleteDocumentHandler,
};
use baas_admin::adapters::InMemoryDocumentStore;
use baas_admin::domain::change::{ChangeEvent, OperationKind};
use baas_admin::domain::foundation::{DocumentId, Topic, UserId};
use baas_admin::ports::{ChangePublisher, DocumentStore};

const TOPICS: [&str; 3] = ["users", "messages", "orders"];

fn topic(name: &str) -> Topic {
    Topic::new(name).unwrap()
}

fn event(name: &str, id: &str) -> ChangeEvent {
    ChangeEvent::updated(topic(name), id, json!({ "id": id }))
}

// =============================================================================
// Delivery rules
// =============================================================================

#[tokio::test]
async fn document_writes_flow_through_the_publisher_port() {
    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    let fanout = Arc::new(FanOut::with_default_capacity());
    let publisher: Arc<dyn ChangePublisher> = fanout.clone();

    let mut sub = fanout.connect().await;
    fanout.subscribe(&sub.connection_id, topic("orders")).await;

    let create = CreateDocumentHandler::new(store.clone(), publisher.clone());
    let delete = DeleteDocumentHandler::new(store, publisher);
    let requested_by = UserId::new("admin-1").unwrap();

    create
        .handle(CreateDocumentCommand {
            collection: topic("orders"),
            id: Some(DocumentId::new("o1").unwrap()),
            data: json!({ "total": 12 }).as_object().cloned().unwrap(),
            requested_by: requested_by.clone(),
        })
        .await
        .unwrap();
    delete
        .handle(DeleteDocumentCommand {
            collection: topic("orders"),
            id: DocumentId::new("o1").unwrap(),
            requested_by,
        })
        .await
        .unwrap();

    let first = sub.events.recv().await.unwrap();
    let second = sub.events.recv().await.unwrap();
    assert_eq!(first.operation_kind, OperationKind::Created);
    assert_eq!(second.operation_kind, OperationKind::Deleted);
    assert_eq!(second.payload["data"]["total"], 12);
}

#[tokio::test]
async fn events_arrive_in_publish_order() {
    let fanout = FanOut::with_default_capacity();
    let mut sub = fanout.connect().await;
    fanout.subscribe(&sub.connection_id, topic("messages")).await;

    for i in 0..20 {
        fanout.publish(event("messages", &format!("m{}", i))).await;
    }

    for i in 0..20 {
        let received = sub.events.recv().await.unwrap();
        assert_eq!(received.resource_id, format!("m{}", i));
    }
}

#[tokio::test]
async fn closed_connection_stops_receiving_and_frees_topics() {
    let fanout = FanOut::with_default_capacity();
    let sub = fanout.connect().await;
    fanout.subscribe(&sub.connection_id, topic("users")).await;
    fanout.subscribe(&sub.connection_id, topic("orders")).await;

    assert_eq!(fanout.on_connection_closed(&sub.connection_id).await, 2);
    assert_eq!(fanout.on_connection_closed(&sub.connection_id).await, 0);

    assert_eq!(fanout.publish(event("users", "u1")).await, 0);
    assert!(fanout.active_topics().await.is_empty());
    assert_eq!(
        fanout.subscribe(&sub.connection_id, topic("users")).await,
        SubscribeOutcome::UnknownConnection
    );
}

#[tokio::test]
async fn slow_subscriber_does_not_hold_back_others() {
    let fanout = FanOut::new(1);
    let slow = fanout.connect().await;
    let mut fast = fanout.connect().await;
    fanout.subscribe(&slow.connection_id, topic("users")).await;
    fanout.subscribe(&fast.connection_id, topic("users")).await;

    fanout.publish(event("users", "u1")).await;
    assert_eq!(fast.events.recv().await.unwrap().resource_id, "u1");

    // slow's queue is still full
    fanout.publish(event("users", "u2")).await;
    assert_eq!(fast.events.recv().await.unwrap().resource_id, "u2");
}

#[tokio::test]
async fn building_http_handlers_registers_no_connection() {
    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    let fanout = Arc::new(FanOut::with_default_capacity());

    let _handlers = DocumentHandlers::new(store, fanout.clone());
    assert_eq!(fanout.connection_count().await, 0);
}

// =============================================================================
// Property: delivery matches subscriptions exactly
// =============================================================================

proptest! {
    #[test]
    fn each_connection_receives_exactly_its_topics(
        subscriptions in prop::collection::vec(prop::collection::btree_set(0usize..3, 0..=3), 1..6),
        published in prop::collection::vec(0usize..3, 0..12),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let fanout = FanOut::with_default_capacity();
            let mut subscribers = Vec::new();
            for wanted in &subscriptions {
                let sub = fanout.connect().await;
                for &t in wanted {
                    fanout.subscribe(&sub.connection_id, topic(TOPICS[t])).await;
                }
                subscribers.push((sub, wanted.clone()));
            }

            let mut expected: HashMap<usize, Vec<String>> = HashMap::new();
            for (n, &t) in published.iter().enumerate() {
                let id = format!("e{}", n);
                let delivered = fanout.publish(event(TOPICS[t], &id)).await;
                let interested: Vec<usize> = subscribers
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, wanted))| wanted.contains(&t))
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(delivered, interested.len());
                for i in interested {
                    expected.entry(i).or_default().push(id.clone());
                }
            }

            for (i, (sub, _)) in subscribers.iter_mut().enumerate() {
                let mut received = Vec::new();
                while let Ok(event) = sub.events.try_recv() {
                    received.push(event.resource_id);
                }
                assert_eq!(received, expected.remove(&i).unwrap_or_default());
            }

            let active: BTreeSet<String> = fanout
                .active_topics()
                .await
                .iter()
                .map(|t| t.as_str().to_string())
                .collect();
            let subscribed: BTreeSet<String> = subscriptions
                .iter()
                .flatten()
                .map(|&t| TOPICS[t].to_string())
                .collect();
            assert_eq!(active, subscribed);
        });
    }
}
