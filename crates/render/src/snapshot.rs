//! HTTP client for the snapshot rendering service.
//!
//! The primary render tier: the slide document is POSTed to an
//! external service that loads it in a headless browser and replies
//! with encoded image bytes.

use std::time::Duration;

use serde::Serialize;

use crate::error::RenderError;
use crate::output::{decode_output, RenderedImage};
use crate::OUTPUT_SIZE;

/// Default time allowed for one snapshot render.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP client for a snapshot service instance.
pub struct SnapshotClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

/// Body of the `POST /render` request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest<'a> {
    visual_document: &'a str,
    width: u32,
    height: u32,
}

impl SnapshotClient {
    /// Create a client with the default timeout.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://localhost:3100`.
    pub fn new(base_url: String) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-render timeout.
    pub fn with_timeout(base_url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Base HTTP URL of the snapshot service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Render a self-contained HTML document at canvas size.
    ///
    /// Sends a `POST /render` request and decodes the returned bytes.
    /// Timeouts are reported as [`RenderError::Timeout`], non-2xx
    /// replies as [`RenderError::Backend`] with the body preserved.
    pub async fn render(&self, document: &str) -> Result<RenderedImage, RenderError> {
        let body = RenderRequest {
            visual_document: document,
            width: OUTPUT_SIZE,
            height: OUTPUT_SIZE,
        };

        let response = self
            .client
            .post(format!("{}/render", self.base_url))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;
        let response = Self::ensure_success(response).await?;

        let bytes = response.bytes().await.map_err(classify_transport)?;
        decode_output(bytes.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`RenderError::Backend`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RenderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RenderError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

fn classify_transport(error: reqwest::Error) -> RenderError {
    if error.is_timeout() {
        RenderError::Timeout
    } else {
        RenderError::Request(error)
    }
}
