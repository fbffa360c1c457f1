//! Record sinks: where a run's retained profiles end up.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use leadscout_core::ScoredProfile;

use crate::error::SinkError;

/// Receives the retained records of a run, once per run.
pub trait RecordSink: Send + Sync {
    fn push_batch(
        &self,
        records: &[ScoredProfile],
    ) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// Writes each batch as a pretty-printed JSON array, replacing the file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for JsonFileSink {
    async fn push_batch(&self, records: &[ScoredProfile]) -> Result<(), SinkError> {
        let body = serde_json::to_vec_pretty(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| SinkError::Io {
                    path: parent.display().to_string(),
                    source,
                })?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|source| SinkError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        tracing::info!(
            path = %self.path.display(),
            records = records.len(),
            "wrote lead batch"
        );
        Ok(())
    }
}

/// Keeps every batch in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Mutex<Vec<Vec<ScoredProfile>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every batch pushed so far, oldest first.
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<ScoredProfile>> {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// All records across batches.
    #[must_use]
    pub fn records(&self) -> Vec<ScoredProfile> {
        self.batches().into_iter().flatten().collect()
    }
}

impl RecordSink for MemorySink {
    async fn push_batch(&self, records: &[ScoredProfile]) -> Result<(), SinkError> {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(records.to_vec());
        Ok(())
    }
}
