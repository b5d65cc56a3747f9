//! Diagram rendering service client
//!
//! Wraps the single outbound HTTP call of the application: one POST of the
//! PlantUML source to the configured rendering endpoint. One attempt, no
//! retry, no fallback; a non-200 response surfaces as a user-visible error.

use crate::config::RendererConfig;
use crate::error::AppError;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Image payload returned by the rendering service
pub struct RenderedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// HTTP client for the diagram rendering service
pub struct RenderClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RenderClient {
    pub fn new(config: &RendererConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Render a diagram source document into an image
    pub async fn render(&self, source: &str) -> Result<RenderedImage, AppError> {
        debug!("Rendering diagram ({} bytes) via {}", source.len(), self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(source.to_owned())
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(AppError::RenderFailed {
                status: response.status().as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        debug!("Renderer returned {} bytes ({})", bytes.len(), content_type);
        Ok(RenderedImage {
            content_type,
            bytes,
        })
    }
}
