//! In-memory document store.
//!
//! Behaves like the managed document database for development and tests:
//! collections are created on first write, missing documents are
//! `not-found` and duplicate creates are `already-exists`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};

use crate::domain::documents::{Document, ListQuery};
use crate::domain::fault::{codes, Fault};
use crate::domain::foundation::{DocumentId, Timestamp, Topic};
use crate::ports::DocumentStore;

type Collection = BTreeMap<DocumentId, Document>;

/// `DocumentStore` kept entirely in process memory.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<Topic, Collection>>,
    /// Fault returned by the next call instead of touching the data.
    injected: Mutex<Option<Fault>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next operation fail with `fault`.
    pub async fn fail_next(&self, fault: Fault) {
        *self.injected.lock().await = Some(fault);
    }

    pub async fn document_count(&self, collection: &Topic) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    async fn take_injected(&self) -> Result<(), Fault> {
        match self.injected.lock().await.take() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }
}

fn not_found(collection: &Topic, id: &DocumentId) -> Fault {
    Fault::document_store(
        codes::document::NOT_FOUND,
        format!("No document to read or modify at {}/{}", collection, id),
    )
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(
        &self,
        collection: &Topic,
        id: Option<DocumentId>,
        data: Map<String, Value>,
    ) -> Result<Document, Fault> {
        self.take_injected().await?;

        let id = id.unwrap_or_else(DocumentId::generate);
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.clone()).or_default();

        if docs.contains_key(&id) {
            return Err(Fault::document_store(
                codes::document::ALREADY_EXISTS,
                format!("Document already exists: {}/{}", collection, id),
            ));
        }

        let now = Timestamp::now();
        let document = Document {
            collection: collection.clone(),
            id: id.clone(),
            data,
            create_time: now,
            update_time: now,
        };
        docs.insert(id, document.clone());
        Ok(document)
    }

    async fn get(&self, collection: &Topic, id: &DocumentId) -> Result<Document, Fault> {
        self.take_injected().await?;

        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
            .ok_or_else(|| not_found(collection, id))
    }

    async fn list(&self, collection: &Topic, query: &ListQuery) -> Result<Vec<Document>, Fault> {
        self.take_injected().await?;

        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut documents: Vec<Document> = match &query.order_by {
            Some(path) => {
                let mut keyed: Vec<(&Value, &Document)> = docs
                    .values()
                    .filter_map(|d| field_at(&d.data, path).map(|v| (v, d)))
                    .collect();
                keyed.sort_by(|(a, _), (b, _)| compare_values(a, b));
                keyed.into_iter().map(|(_, d)| d.clone()).collect()
            }
            None => docs.values().cloned().collect(),
        };

        if query.descending {
            documents.reverse();
        }
        documents.truncate(query.limit as usize);
        Ok(documents)
    }

    async fn update(
        &self,
        collection: &Topic,
        id: &DocumentId,
        data: Map<String, Value>,
        merge: bool,
    ) -> Result<Document, Fault> {
        self.take_injected().await?;

        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| not_found(collection, id))?;

        if merge {
            deep_merge(&mut document.data, data);
        } else {
            document.data = data;
        }
        document.update_time = Timestamp::now();
        Ok(document.clone())
    }

    async fn delete(&self, collection: &Topic, id: &DocumentId) -> Result<Document, Fault> {
        self.take_injected().await?;

        let mut collections = self.collections.write().await;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        let removed = docs.remove(id).ok_or_else(|| not_found(collection, id))?;
        if docs.is_empty() {
            collections.remove(collection);
        }
        Ok(removed)
    }
}

/// Value at a dot-separated field path.
fn field_at<'a>(data: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Orders values by type first, then by value within a type.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Merges nested objects key by key; other values are replaced.
fn deep_merge(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}
