use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Body of `POST /track`, as sent by the tracker and accepted by the collector.
///
/// Every field is optional on the wire. Absent and `null` become `""`, and
/// non-string scalars keep their JSON text, so `"value": 25` reads as `"25"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TrackPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(min = 1))]
    pub session_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(min = 1))]
    pub event: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub path: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

/// Fields that must be present and non-empty, in reporting order.
pub const REQUIRED_FIELDS: [&str; 2] = ["session_id", "event"];

impl TrackPayload {
    pub fn new(
        session_id: impl Into<String>,
        event: impl Into<String>,
        path: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            event: event.into(),
            path: path.into(),
            value: value.into(),
        }
    }

    /// Names of the required fields that failed validation. Empty when valid.
    pub fn missing_required(&self) -> Vec<&'static str> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => {
                let fields = errors.field_errors();
                REQUIRED_FIELDS
                    .iter()
                    .copied()
                    .filter(|name| fields.contains_key(name))
                    .collect()
            }
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Event tags emitted by the tracker. The collector accepts any tag.
pub mod tags {
    pub const PAGE_VIEW: &str = "page_view";
    pub const CLICK: &str = "click";
    pub const SCROLL_DEPTH: &str = "scroll_depth";
    pub const PAGE_TIME: &str = "page_time";
    pub const SESSION_TIME: &str = "session_time";
}
