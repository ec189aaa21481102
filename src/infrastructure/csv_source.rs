// CSV-backed dataset source
use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;

use crate::application::dataset_source::DatasetSource;
use crate::domain::observation::Observation;

/// Reads the trailing `max_records` rows of a headerless
/// `timestamp,raw_count[,location]` file. Malformed rows are logged and
/// skipped; surviving rows keep their recorded order.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
    max_records: usize,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>, max_records: usize) -> Self {
        Self {
            path: path.into(),
            max_records,
        }
    }
}

#[async_trait]
impl DatasetSource for CsvFileSource {
    async fn load(&self) -> anyhow::Result<Vec<Observation>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read dataset at {}", self.path.display()))?;

        let rows: Vec<&str> = raw.lines().filter(|line| !line.trim().is_empty()).collect();
        let start = rows.len().saturating_sub(self.max_records);

        let mut observations = Vec::with_capacity(rows.len() - start);
        for row in &rows[start..] {
            match Observation::parse_record(row) {
                Ok(obs) => observations.push(obs),
                Err(err) => tracing::warn!(%err, %row, "skipping malformed observation record"),
            }
        }
        Ok(observations)
    }
}
