//! Downloading source images over HTTP.

use futures_util::StreamExt;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::FetchConfig;
use crate::error::FetchError;

/// Fetches image bytes from http(s) URLs with a hard timeout and size cap.
///
/// Failures are reported once; nothing is retried.
pub struct ImageFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl ImageFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| FetchError::Request {
                url: String::new(),
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    /// Check that `url` is an absolute http(s) URL before any I/O happens.
    pub fn validate_url(url: &str) -> Result<reqwest::Url, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(FetchError::InvalidUrl {
                url: url.to_string(),
                message: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    /// Download the body at `url`.
    ///
    /// The whole exchange, headers and body, must finish within
    /// `fetch.timeout_ms`. Non-2xx responses are errors.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = Self::validate_url(url)?;
        let timeout_ms = self.config.timeout_ms;

        tracing::debug!(url = %url, "Fetching image");
        match timeout(Duration::from_millis(timeout_ms), self.download(parsed, url)).await {
            Ok(result) => {
                if let Ok(bytes) = &result {
                    tracing::debug!(url = %url, bytes = bytes.len(), "Fetched image");
                }
                result
            }
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                timeout_ms,
            }),
        }
    }

    async fn download(&self, parsed: reqwest::Url, url: &str) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.config.max_image_bytes;
        let request_error = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    timeout_ms: self.config.timeout_ms,
                }
            } else {
                FetchError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let resp = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(request_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let too_large = || FetchError::TooLarge {
            url: url.to_string(),
            max_bytes,
        };
        if resp.content_length().is_some_and(|len| len > max_bytes) {
            return Err(too_large());
        }

        let mut body = Vec::new();
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(request_error)?;
            if body.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}
