use ::clickhouse::Client;
use async_trait::async_trait;

use super::{EventStore, StoreError};
use crate::models::EventRow;
use crate::schema::{CREATE_EVENTS_TABLE, EVENTS_TABLE, SELECT_RECENT_EVENTS};

/// Event store backed by a ClickHouse MergeTree table.
#[derive(Clone)]
pub struct ClickHouseStore {
    client: Client,
}

impl ClickHouseStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EventStore for ClickHouseStore {
    async fn init(&self) -> Result<(), StoreError> {
        self.client.query(CREATE_EVENTS_TABLE).execute().await?;
        tracing::info!(table = EVENTS_TABLE, "event table ready");
        Ok(())
    }

    async fn insert(&self, row: EventRow) -> Result<(), StoreError> {
        let mut insert = self.client.insert(EVENTS_TABLE)?;
        insert.write(&row).await?;
        insert.end().await?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<EventRow>, StoreError> {
        let rows = self
            .client
            .query(SELECT_RECENT_EVENTS)
            .bind(limit as u64)
            .fetch_all::<EventRow>()
            .await?;
        Ok(rows)
    }
}
