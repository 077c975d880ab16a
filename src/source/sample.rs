//! Built-in sample data.
//!
//! Serves a fixed set of payloads shaped like a healthy collection pipeline.
//! Useful for trying the dashboard without a backend and as test fixtures.

use async_trait::async_trait;

use super::{
    AlertPayload, CollectionStatusPayload, DashboardSource, HealthPayload, QualityPayload,
    SystemPayload,
};
use crate::error::FetchError;

/// A source that always returns the sample payloads.
#[derive(Debug, Clone)]
pub struct SampleSource {
    description: String,
}

impl SampleSource {
    pub fn new() -> Self {
        Self {
            description: "sample data".to_string(),
        }
    }
}

impl Default for SampleSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DashboardSource for SampleSource {
    async fn fetch_health(&self) -> Result<HealthPayload, FetchError> {
        Ok(health())
    }

    async fn fetch_quality(&self) -> Result<QualityPayload, FetchError> {
        Ok(quality())
    }

    async fn fetch_collection_status(&self) -> Result<Vec<CollectionStatusPayload>, FetchError> {
        Ok(collection_status())
    }

    async fn fetch_alerts(&self) -> Result<Vec<AlertPayload>, FetchError> {
        Ok(alerts())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

pub fn health() -> HealthPayload {
    HealthPayload {
        overall_score: 85.5,
        status: "good".to_string(),
        system: SystemPayload {
            cpu_percent: 45.2,
            memory_percent: 62.8,
            disk_percent: 34.1,
        },
    }
}

pub fn quality() -> QualityPayload {
    QualityPayload {
        completeness: 0.95,
        consistency: 0.88,
        accuracy: 0.92,
        timeliness: 0.85,
        validity: 0.97,
        uniqueness: 0.94,
    }
}

pub fn collection_status() -> Vec<CollectionStatusPayload> {
    vec![
        CollectionStatusPayload {
            name: "College Scorecard API".to_string(),
            status: "healthy".to_string(),
            records: 6_543,
            last_update: "2 minutes ago".to_string(),
        },
        CollectionStatusPayload {
            name: "Social Media".to_string(),
            status: "warning".to_string(),
            records: 1_204,
            last_update: "15 minutes ago".to_string(),
        },
        CollectionStatusPayload {
            name: "Vector Database".to_string(),
            status: "healthy".to_string(),
            records: 48_210,
            last_update: "1 minute ago".to_string(),
        },
    ]
}

pub fn alerts() -> Vec<AlertPayload> {
    vec![
        AlertPayload {
            severity: "medium".to_string(),
            message: "Social media API rate limit at 80%".to_string(),
            timestamp: "2024-01-15 10:30:00".to_string(),
        },
        AlertPayload {
            severity: "low".to_string(),
            message: "Timeliness below 0.90 for scorecard batch".to_string(),
            timestamp: "2024-01-15 09:45:00".to_string(),
        },
    ]
}
