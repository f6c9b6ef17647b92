use thiserror::Error;

/// Error type that captures ledger persistence failures.
///
/// Queries that match nothing never produce an error; they return empty
/// collections or `None` instead.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Failures surfaced by the advisory client. Always propagated to the
/// caller so the embedding UI can decide its own fallback behaviour.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("API key not configured")]
    MissingApiKey,
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Advisory service error: {0}")]
    Api(String),
    #[error("Advisory service returned an unexpected response shape")]
    MalformedResponse,
}
