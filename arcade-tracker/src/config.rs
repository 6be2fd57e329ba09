use std::time::Duration;

/// How new session ids are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    /// Random v4 UUID.
    Uuid,
    /// Short base-36 string, for hosts without a secure random source.
    /// Collisions are possible and not corrected.
    Short,
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Collector `POST /track` URL.
    pub endpoint: String,
    /// Period of the `session_time` heartbeat.
    pub heartbeat_interval: Duration,
    /// Minimum spacing between scroll samples.
    pub scroll_throttle: Duration,
    pub request_timeout: Duration,
    pub id_source: IdSource,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3005/track".into(),
            heartbeat_interval: Duration::from_secs(60),
            scroll_throttle: Duration::from_millis(100),
            request_timeout: Duration::from_secs(10),
            id_source: IdSource::Uuid,
        }
    }
}

impl TrackerConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_id_source(mut self, id_source: IdSource) -> Self {
        self.id_source = id_source;
        self
    }
}
