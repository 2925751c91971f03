//! In-memory product and order collections
//!
//! Each collection owns its own reader/writer lock. Records go in and come
//! out by value, so callers never hold a reference into the map.

use crate::error::{OrderError, Result};
use crate::grpc::ecommerce::{Order, Product};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// A record keyed by a server-assigned string id
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

impl Record for Product {
    const KIND: &'static str = "product";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Record for Order {
    const KIND: &'static str = "order";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug)]
pub struct MemoryStore<T> {
    records: RwLock<HashMap<String, T>>,
}

pub type ProductStore = MemoryStore<Product>;
pub type OrderStore = MemoryStore<Order>;

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` under a freshly generated id, replacing whatever id
    /// the caller supplied, and return that id.
    pub async fn insert(&self, mut record: T) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let mut records = self.records.write().await;

        if records.contains_key(&id) {
            return Err(OrderError::Internal(format!(
                "generated {} id {} already in use",
                T::KIND,
                id
            )));
        }

        record.set_id(id.clone());
        records.insert(id.clone(), record);
        debug!(kind = T::KIND, id = %id, "Record inserted");
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.records.read().await.get(id).cloned()
    }

    /// Insert or replace every record by its own id under a single write lock
    ///
    /// Later entries win when the batch repeats an id.
    pub async fn upsert_all(&self, batch: Vec<T>) -> usize {
        let count = batch.len();
        let mut records = self.records.write().await;
        for record in batch {
            records.insert(record.id().to_string(), record);
        }
        debug!(kind = T::KIND, count, "Records upserted");
        count
    }

    /// Copy of every record at the time of the call
    pub async fn snapshot(&self) -> Vec<T> {
        self.records.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
