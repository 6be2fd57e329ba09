use crate::config::IdSource;
use crate::error::TrackerError;
use crate::storage::SessionStorage;

pub const SESSION_ID_KEY: &str = "session_id";
pub const SESSION_START_KEY: &str = "session_start";

/// Identity shared by every page opened on the same storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    /// Epoch milliseconds of the first page open.
    pub started_at_ms: i64,
}

impl Session {
    /// Reuse the stored session, filling in whatever is missing. Both values
    /// are written once and never expire.
    pub fn restore_or_create(
        storage: &dyn SessionStorage,
        id_source: IdSource,
        now_ms: i64,
    ) -> Result<Self, TrackerError> {
        let id = match storage.get(SESSION_ID_KEY).filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                let id = new_session_id(id_source);
                storage.set(SESSION_ID_KEY, &id)?;
                tracing::debug!(session_id = %id, "new session");
                id
            }
        };

        let started_at_ms = match storage
            .get(SESSION_START_KEY)
            .and_then(|raw| raw.parse::<i64>().ok())
        {
            Some(started) => started,
            None => {
                storage.set(SESSION_START_KEY, &now_ms.to_string())?;
                now_ms
            }
        };

        Ok(Self { id, started_at_ms })
    }

    /// Whole seconds since the session started, rounded.
    pub fn elapsed_secs(&self, now_ms: i64) -> i64 {
        round_secs(now_ms - self.started_at_ms)
    }
}

pub(crate) fn round_secs(millis: i64) -> i64 {
    (millis as f64 / 1000.0).round() as i64
}

pub fn new_session_id(source: IdSource) -> String {
    match source {
        IdSource::Uuid => uuid::Uuid::new_v4().to_string(),
        IdSource::Short => to_base36(rand::random::<u64>()),
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::with_capacity(13);
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
