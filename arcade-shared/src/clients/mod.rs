pub mod clickhouse;

pub use self::clickhouse::{create_client, ClickHouseSettings};
