// Source trait for loading the observation dataset
use crate::domain::observation::Observation;
use async_trait::async_trait;

#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Load the full dataset in chronological order, as recorded.
    async fn load(&self) -> anyhow::Result<Vec<Observation>>;
}
