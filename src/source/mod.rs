//! Data source abstraction for the four monitoring endpoints.
//!
//! A [`DashboardSource`] answers four independent, parameterless pulls:
//! health, quality, collection status and alerts. Implementations exist for
//! the HTTP backend, a local JSON document, and built-in sample data.

mod file;
mod http;
mod payload;
pub mod sample;

pub use file::FileSource;
pub use http::{EndpointPaths, HttpSource, HttpSourceBuilder};
pub use payload::{
    AlertPayload, CollectionStatusPayload, HealthPayload, QualityPayload, SystemPayload,
};
pub use sample::SampleSource;

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::FetchError;

/// Trait for pulling dashboard data from a backend.
///
/// Each method is an independent fetch; a failure in one says nothing about
/// the others. Implementations must be shareable across tasks because a
/// refresh cycle runs on the async runtime, not on the UI thread.
///
/// # Example
///
/// ```
/// use collectwatch::{DashboardSource, SampleSource};
///
/// # tokio_test::block_on(async {
/// let source = SampleSource::new();
/// let health = source.fetch_health().await.unwrap();
/// assert_eq!(health.overall_score, 85.5);
/// # });
/// ```
#[async_trait]
pub trait DashboardSource: Send + Sync + Debug {
    /// Fetch overall health and host resource usage.
    async fn fetch_health(&self) -> Result<HealthPayload, FetchError>;

    /// Fetch the six data quality dimensions.
    async fn fetch_quality(&self) -> Result<QualityPayload, FetchError>;

    /// Fetch the ordered list of collection source statuses.
    async fn fetch_collection_status(&self) -> Result<Vec<CollectionStatusPayload>, FetchError>;

    /// Fetch the ordered list of active alerts.
    async fn fetch_alerts(&self) -> Result<Vec<AlertPayload>, FetchError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}

/// Identifies one of the four independent sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    Health,
    Quality,
    CollectionStatus,
    Alerts,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Health,
        SourceKind::Quality,
        SourceKind::CollectionStatus,
        SourceKind::Alerts,
    ];

    /// Name used in logs and as the section key of file sources.
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Health => "health",
            SourceKind::Quality => "quality",
            SourceKind::CollectionStatus => "collection_status",
            SourceKind::Alerts => "alerts",
        }
    }
}
