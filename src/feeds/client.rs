use std::time::Duration;

use log::debug;
use reqwest::Client;
use url::Url;

use crate::error::{QueueStatusError, Result};

use super::nodepool::CapacityConfig;
use super::zuul::PipelineSnapshot;

/// HTTP client for the Zuul status feed and the nodepool capacity feed.
///
/// Responses are requested gzip-encoded and decompressed transparently. Every
/// request is bounded by the same timeout and is never retried.
pub struct FeedClient {
    client: Client,
    status_url: Url,
    capacity_url: Url,
}

impl FeedClient {
    pub fn new(status_url: &str, capacity_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("zuul-queue-status/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .timeout(timeout)
            .build()
            .map_err(|e| QueueStatusError::Config(format!("Failed to create HTTP client: {e}")))?;

        let status_url = Url::parse(status_url)
            .map_err(|e| QueueStatusError::Config(format!("Invalid status feed URL: {e}")))?;
        let capacity_url = Url::parse(capacity_url)
            .map_err(|e| QueueStatusError::Config(format!("Invalid capacity feed URL: {e}")))?;

        Ok(Self {
            client,
            status_url,
            capacity_url,
        })
    }

    /// Fetches the live pipeline snapshot. Never cached.
    pub async fn fetch_status(&self) -> Result<PipelineSnapshot> {
        let body = self.get(&self.status_url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches and decodes the nodepool configuration.
    pub async fn fetch_capacity_config(&self) -> Result<CapacityConfig> {
        let body = self.get(&self.capacity_url).await?;
        Ok(serde_yaml::from_str(&body)?)
    }

    async fn get(&self, url: &Url) -> Result<String> {
        debug!("Fetching {url}");

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(QueueStatusError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}
