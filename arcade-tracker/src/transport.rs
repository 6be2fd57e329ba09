use async_trait::async_trait;
use std::time::Duration;

use arcade_shared::TrackPayload;

use crate::error::TrackerError;

/// Delivers one event to the collector.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn deliver(&self, payload: &TrackPayload) -> Result<(), TrackerError>;
}

/// JSON `POST` to the collector. Non-2xx responses are errors.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TrackerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn deliver(&self, payload: &TrackPayload) -> Result<(), TrackerError> {
        self.client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
