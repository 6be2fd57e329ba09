use async_trait::async_trait;

use crate::models::EventRow;

mod clickhouse;
mod memory;

pub use self::clickhouse::ClickHouseStore;
pub use self::memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("clickhouse error: {0}")]
    ClickHouse(#[from] ::clickhouse::error::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only event storage.
///
/// Implementations must be safe to share across request handlers; the
/// collector holds one behind an `Arc` and never serializes access to it.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Create the backing table if it does not exist yet.
    async fn init(&self) -> Result<(), StoreError>;

    /// Append one row. No dedup: identical rows are stored twice.
    async fn insert(&self, row: EventRow) -> Result<(), StoreError>;

    /// Up to `limit` rows, newest `ts` first.
    async fn recent(&self, limit: usize) -> Result<Vec<EventRow>, StoreError>;
}
