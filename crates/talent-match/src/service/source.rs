use std::path::{Path, PathBuf};

use crate::dataset::{self, DatasetError};
use crate::engine::{TalentSnapshot, VariableCatalog, WeightConfig};

/// Storage abstraction so the service can be exercised without files.
pub trait SnapshotSource: Send + Sync {
    fn snapshot(&self) -> Result<TalentSnapshot, SourceError>;
    fn weights(&self) -> Result<WeightConfig, SourceError>;
}

/// Error enumeration for snapshot source failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Reads a fresh snapshot from a directory of CSV exports on every call.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
    catalog: VariableCatalog,
}

impl CsvDirectorySource {
    pub fn new(root: impl Into<PathBuf>, catalog: VariableCatalog) -> Self {
        Self {
            root: root.into(),
            catalog,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SnapshotSource for CsvDirectorySource {
    fn snapshot(&self) -> Result<TalentSnapshot, SourceError> {
        Ok(dataset::load_snapshot(&self.root, &self.catalog)?)
    }

    fn weights(&self) -> Result<WeightConfig, SourceError> {
        Ok(dataset::load_weights(&self.root)?)
    }
}

/// Fixed snapshot held in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    snapshot: TalentSnapshot,
    weights: WeightConfig,
}

impl StaticSource {
    pub fn new(snapshot: TalentSnapshot, weights: WeightConfig) -> Self {
        Self { snapshot, weights }
    }
}

impl SnapshotSource for StaticSource {
    fn snapshot(&self) -> Result<TalentSnapshot, SourceError> {
        Ok(self.snapshot.clone())
    }

    fn weights(&self) -> Result<WeightConfig, SourceError> {
        Ok(self.weights.clone())
    }
}
