//! HTTP access to the DC/OS metrics service.
//!
//! One [`Fetcher`] owns one `reqwest::Client` configured with the request
//! timeout, so an unresponsive endpoint can only stall a cycle for a bounded
//! time. There is no retry here; a failed request fails the cycle.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};

use crate::config::PollConfig;
use crate::error::{PluginError, Result};
use crate::producers::MetricsMessage;

/// Upper bound for a response body read into memory.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Authenticated GET client for metrics endpoint paths.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: PollConfig,
    max_body_bytes: usize,
}

impl Fetcher {
    pub fn new(config: &PollConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| PluginError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Caps the size of accepted response bodies.
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Fetches one metrics endpoint and decodes it as a [`MetricsMessage`].
    pub async fn fetch(&self, path: &str) -> Result<MetricsMessage> {
        self.fetch_json(path).await
    }

    /// Fetches `path` and decodes the body as `T`.
    #[instrument(skip(self), fields(plugin = "http-helper"))]
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        // PollConfig::build rejects an empty token; re-checked per request
        let token = self.config.auth_token();
        if token.is_empty() {
            return Err(PluginError::Config(
                "Auth token must be set, use --auth-token <token>".into(),
            ));
        }

        let url = self.config.url_for(path);
        let auth = HeaderValue::from_str(&format!("token={}", token)).map_err(|_| {
            PluginError::Config("Auth token contains characters not allowed in a header".into())
        })?;

        info!("Making request to {}", url);
        let mut response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|source| {
                error!("Encountered error requesting data, {}", source);
                PluginError::Transport {
                    url: url.clone(),
                    source,
                }
            })?;

        debug!("Response status {} from {}", response.status(), url);

        let too_large = || {
            error!(
                "Response body from {} exceeds {} bytes",
                url, self.max_body_bytes
            );
            PluginError::BodyTooLarge {
                url: url.clone(),
                limit: self.max_body_bytes,
            }
        };

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|source| {
            error!("Encountered error reading response body, {}", source);
            PluginError::Io {
                url: url.clone(),
                source,
            }
        })? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body).map_err(|source| {
            let body = String::from_utf8_lossy(&body).into_owned();
            error!(
                "Encountered error parsing JSON, {}. JSON Content was: {}",
                source, body
            );
            PluginError::Decode {
                path: path.to_string(),
                body,
                source,
            }
        })
    }
}
