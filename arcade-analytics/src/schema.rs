//! ClickHouse table schema for collected events.

pub const EVENTS_TABLE: &str = "events";

/// Append-only, ordered by capture time for range scans. No secondary
/// indexes, no partitioning, no TTL.
pub const CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    ts DateTime,
    session_id String,
    event String,
    path String,
    value String
)
ENGINE = MergeTree
ORDER BY ts
"#;

/// Newest first. `?fields` expands to the columns of `EventRow`.
pub const SELECT_RECENT_EVENTS: &str = "SELECT ?fields FROM events ORDER BY ts DESC LIMIT ?";
