//! Wire types for the four monitoring endpoints.
//!
//! These match the JSON bodies served by the pipeline backend. They are
//! deliberately loose (severities are plain strings); typing happens when
//! a payload is turned into a snapshot in [`crate::data`].

use serde::{Deserialize, Serialize};

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPayload {
    /// Overall pipeline health, nominally 0-100.
    pub overall_score: f64,
    /// Status string as reported by the backend ("good", "warning", ...).
    #[serde(default)]
    pub status: String,
    /// Host resource usage.
    pub system: SystemPayload,
}

/// Host resource usage percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemPayload {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
}

/// Body of the quality endpoint. Each dimension is a ratio in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityPayload {
    pub completeness: f64,
    pub consistency: f64,
    pub accuracy: f64,
    pub timeliness: f64,
    pub validity: f64,
    pub uniqueness: f64,
}

/// One entry of the collection-status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStatusPayload {
    pub name: String,
    pub status: String,
    /// Number of records collected so far.
    pub records: u64,
    /// Human-readable recency, e.g. "2 minutes ago".
    pub last_update: String,
}

/// One entry of the alerts endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub severity: String,
    pub message: String,
    /// Timestamp in whatever format the backend produces.
    pub timestamp: String,
}
