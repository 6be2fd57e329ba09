use arcade_shared::TrackPayload;
use chrono::{DateTime, TimeZone, Utc};
use clickhouse::Row;
use serde::{Deserialize, Serialize};

// --- Stored row ---

/// One row of the `events` table. `ts` is a ClickHouse `DateTime`, which
/// travels as unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Row, Serialize, Deserialize)]
pub struct EventRow {
    pub ts: u32,
    pub session_id: String,
    pub event: String,
    pub path: String,
    pub value: String,
}

impl EventRow {
    /// Build the row for an accepted payload captured at `at`. Sub-second
    /// precision is dropped.
    pub fn capture(payload: TrackPayload, at: DateTime<Utc>) -> Self {
        Self {
            ts: at.timestamp().clamp(0, u32::MAX as i64) as u32,
            session_id: payload.session_id,
            event: payload.event,
            path: payload.path,
            value: payload.value,
        }
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.ts as i64, 0).single().unwrap_or_default()
    }
}

// --- API representation ---

/// An event as returned by `GET /events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(with = "ts_format")]
    pub ts: DateTime<Utc>,
    pub session_id: String,
    pub event: String,
    pub path: String,
    pub value: String,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            ts: row.captured_at(),
            session_id: row.session_id,
            event: row.event,
            path: row.path,
            value: row.value,
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, the text form ClickHouse uses for `DateTime`.
mod ts_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
