use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{EventStore, StoreError};
use crate::models::EventRow;

/// In-process, append-only event store. Rows live as long as the process.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<Vec<EventRow>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Every stored row in insertion order.
    pub async fn all(&self) -> Vec<EventRow> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn init(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(&self, row: EventRow) -> Result<(), StoreError> {
        self.rows.write().await.push(row);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<EventRow>, StoreError> {
        let rows = self.rows.read().await;
        // Latest insertion first, then a stable sort keeps that order among equal timestamps.
        let mut recent: Vec<EventRow> = rows.iter().rev().cloned().collect();
        recent.sort_by(|a, b| b.ts.cmp(&a.ts));
        recent.truncate(limit);
        Ok(recent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ts: u32, value: &str) -> EventRow {
        EventRow {
            ts,
            session_id: "s1".into(),
            event: "click".into(),
            path: "/".into(),
            value: value.into(),
        }
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        store.insert(row(10, "a")).await.unwrap();
        store.insert(row(30, "b")).await.unwrap();
        store.insert(row(20, "c")).await.unwrap();

        let recent = store.recent(2).await.unwrap();
        let values: Vec<&str> = recent.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn equal_timestamps_prefer_latest_insert() {
        let store = MemoryStore::new();
        for value in ["first", "second", "third"] {
            store.insert(row(5, value)).await.unwrap();
        }

        let recent = store.recent(25).await.unwrap();
        let values: Vec<&str> = recent.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn duplicates_are_kept() {
        let store = MemoryStore::new();
        store.insert(row(1, "same")).await.unwrap();
        store.insert(row(1, "same")).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert_eq!(store.all().await[0], store.all().await[1]);
    }
}
