use portfolio_core::ActionError;
use thiserror::Error;

/// Errors returned by the catalog service client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("catalog service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("no catalog service configured (set PORTFOLIO_API_BASE_URL)")]
    NotConfigured,

    #[error("ingestion job {job_id} failed: {reason}")]
    IngestionFailed { job_id: String, reason: String },

    #[error("ingestion job {job_id} still running after {polls} polls")]
    IngestionTimedOut { job_id: String, polls: u32 },

    /// Rejected locally before any request was sent.
    #[error(transparent)]
    Action(#[from] ActionError),
}
