//! File-based data source.
//!
//! Reads a single JSON document holding all four sections.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{
    AlertPayload, CollectionStatusPayload, DashboardSource, HealthPayload, QualityPayload,
    SourceKind,
};
use crate::error::FetchError;

/// A data source that reads dashboard sections from a JSON file.
///
/// The document is an object keyed by section name:
///
/// ```json
/// {
///   "health": { "overall_score": 85.5, "status": "good", "system": { ... } },
///   "quality": { "completeness": 0.95, ... },
///   "collection_status": [ ... ],
///   "alerts": [ ... ]
/// }
/// ```
///
/// The file is re-read on every fetch, so edits show up on the next cycle.
/// Each section is decoded on its own: a missing or malformed section fails
/// only that source.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file and decode one section.
    async fn section<T: DeserializeOwned>(&self, kind: SourceKind) -> Result<T, FetchError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut document: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&content)?;

        let value = document
            .remove(kind.name())
            .ok_or_else(|| FetchError::Missing(kind.name().to_string()))?;

        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl DashboardSource for FileSource {
    async fn fetch_health(&self) -> Result<HealthPayload, FetchError> {
        self.section(SourceKind::Health).await
    }

    async fn fetch_quality(&self) -> Result<QualityPayload, FetchError> {
        self.section(SourceKind::Quality).await
    }

    async fn fetch_collection_status(&self) -> Result<Vec<CollectionStatusPayload>, FetchError> {
        self.section(SourceKind::CollectionStatus).await
    }

    async fn fetch_alerts(&self) -> Result<Vec<AlertPayload>, FetchError> {
        self.section(SourceKind::Alerts).await
    }

    fn description(&self) -> &str {
        &self.description
    }
}
