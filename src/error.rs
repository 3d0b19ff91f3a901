//! Error types for the metrics plugin.
//!
//! Every variant is fatal to the running poll loop: the scheduler aborts the
//! current cycle and hands the error back to its caller.

/// Errors raised while resolving endpoints, fetching metrics or forwarding
/// a batch to the connector.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Invalid or missing configuration (unknown role, empty auth token, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request could not be sent or no response arrived in time.
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response arrived but its body could not be read.
    #[error("Failed to read response body from {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body is larger than the fetcher accepts.
    #[error("Response body from {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    /// The response body is not the expected JSON document.
    #[error("Failed to decode JSON from {path}: {source}. JSON content was: {body}")]
    Decode {
        path: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The downstream connector rejected the batch.
    #[error("Connector failed: {0:#}")]
    Connector(anyhow::Error),
}

impl PluginError {
    pub fn is_config(&self) -> bool {
        matches!(self, PluginError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, PluginError>;
