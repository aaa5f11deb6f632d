use crate::adapters::outbound::registry::is_url;
use crate::ports::outbound::RegistrySource;
use crate::shared::security::{validate_size, MAX_REGISTRY_DOCUMENT_SIZE};
use crate::shared::Result;
use async_trait::async_trait;
use std::time::Duration;

/// HttpRegistrySource adapter for fetching registry documents over HTTP(S)
///
/// This adapter implements the RegistrySource port with an async reqwest
/// client. Failed requests are retried with a short, growing pause.
pub struct HttpRegistrySource {
    client: reqwest::Client,
    max_retries: u32,
}

impl HttpRegistrySource {
    /// Creates a new HTTP source with default configuration
    pub fn new() -> Result<Self> {
        let user_agent = format!("pyproject-external/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            max_retries: 3,
        })
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<String> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.fetch_once(url).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    tracing::debug!(url, attempt, error = %e, "registry request failed");
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("No request was attempted for {}", url)))
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Server returned status code {}", response.status());
        }
        if let Some(length) = response.content_length() {
            validate_size(length, url, MAX_REGISTRY_DOCUMENT_SIZE)?;
        }

        let text = response.text().await?;
        validate_size(text.len() as u64, url, MAX_REGISTRY_DOCUMENT_SIZE)?;
        Ok(text)
    }
}

#[async_trait]
impl RegistrySource for HttpRegistrySource {
    async fn fetch(&self, location: &str) -> Result<String> {
        if !is_url(location) {
            anyhow::bail!("'{}' is not an http(s) URL", location);
        }
        self.fetch_with_retry(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_builds_client() {
        let source = HttpRegistrySource::new().unwrap();
        assert_eq!(source.max_retries, 3);
    }

    #[tokio::test]
    async fn test_rejects_non_url_location() {
        let source = HttpRegistrySource::new().unwrap();
        let err = source.fetch("data/registry.json").await.unwrap_err();
        assert!(err.to_string().contains("not an http(s) URL"));
    }

    #[tokio::test]
    async fn test_unreachable_host_fails_after_retries() {
        let source = HttpRegistrySource {
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(500))
                .build()
                .unwrap(),
            max_retries: 2,
        };
        let result = source.fetch("http://127.0.0.1:9/registry.json").await;
        assert!(result.is_err());
    }
}
