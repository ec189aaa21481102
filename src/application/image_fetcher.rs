// Image fetch collaborator trait
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the raw bytes behind an image location.
    async fn fetch(&self, location: &str) -> anyhow::Result<Bytes>;
}
