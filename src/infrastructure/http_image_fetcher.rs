// HTTP image fetch adapter
use anyhow::{Context, bail};
use async_trait::async_trait;
use bytes::Bytes;

use crate::application::image_fetcher::ImageFetcher;

/// Fetches image bytes over HTTP. Relative locations are joined onto the
/// configured base URL; absolute locations pass through untouched.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpImageFetcher {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn resolve(&self, location: &str) -> String {
        match (&self.base_url, location.starts_with('/')) {
            (Some(base), true) => format!("{}{location}", base.trim_end_matches('/')),
            _ => location.to_string(),
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, location: &str) -> anyhow::Result<Bytes> {
        let url = self.resolve(location);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to request image at {url}"))?;

        if !response.status().is_success() {
            bail!("image request to {url} returned status {}", response.status());
        }

        response
            .bytes()
            .await
            .with_context(|| format!("failed to read image bytes from {url}"))
    }
}
