#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
