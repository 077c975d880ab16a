//! Display-ready snapshots derived from endpoint payloads.
//!
//! Each snapshot is built by a pure transform from its payload and is
//! replaced wholesale on every successful fetch.

use super::severity::{Severity, Thresholds};
use crate::source::{AlertPayload, CollectionStatusPayload, HealthPayload, QualityPayload};

/// A usage percentage together with its severity band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageMetric {
    pub percent: f64,
    pub severity: Severity,
}

/// Pipeline health with derived severity bands.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthSnapshot {
    pub overall_score: f64,
    /// Band derived from `overall_score`.
    pub status: Severity,
    /// Status string the backend reported, kept for display only.
    pub reported_status: String,
    pub cpu: UsageMetric,
    pub memory: UsageMetric,
    pub disk: UsageMetric,
}

impl HealthSnapshot {
    pub fn from_payload(payload: HealthPayload, thresholds: &Thresholds) -> Self {
        let usage = |percent: f64| UsageMetric {
            percent,
            severity: thresholds.classify_usage(percent),
        };

        Self {
            overall_score: payload.overall_score,
            status: thresholds.classify_health(payload.overall_score),
            reported_status: payload.status,
            cpu: usage(payload.system.cpu_percent),
            memory: usage(payload.system.memory_percent),
            disk: usage(payload.system.disk_percent),
        }
    }

    /// Bands for overall score, cpu, memory and disk, in that order.
    pub fn bands(&self) -> [Severity; 4] {
        [
            self.status,
            self.cpu.severity,
            self.memory.severity,
            self.disk.severity,
        ]
    }
}

/// Labels of the quality dimensions, in chart order.
pub const QUALITY_DIMENSIONS: [&str; 6] = [
    "Completeness",
    "Consistency",
    "Accuracy",
    "Timeliness",
    "Validity",
    "Uniqueness",
];

/// Data quality across six dimensions, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySnapshot {
    pub completeness: f64,
    pub consistency: f64,
    pub accuracy: f64,
    pub timeliness: f64,
    pub validity: f64,
    pub uniqueness: f64,
}

impl QualitySnapshot {
    pub fn from_payload(payload: QualityPayload) -> Self {
        Self {
            completeness: payload.completeness,
            consistency: payload.consistency,
            accuracy: payload.accuracy,
            timeliness: payload.timeliness,
            validity: payload.validity,
            uniqueness: payload.uniqueness,
        }
    }

    /// Chart series in [`QUALITY_DIMENSIONS`] order.
    pub fn series(&self) -> [f64; 6] {
        [
            self.completeness,
            self.consistency,
            self.accuracy,
            self.timeliness,
            self.validity,
            self.uniqueness,
        ]
    }

    /// Mean over all dimensions.
    pub fn average(&self) -> f64 {
        self.series().iter().sum::<f64>() / 6.0
    }
}

/// Status of one collection source.
///
/// Parsing is case-insensitive. Anything unrecognized is kept verbatim in
/// [`SourceStatus::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Healthy,
    Warning,
    Error,
    Unknown(String),
}

/// The three indicator classes a collection source can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Healthy,
    Warning,
    Error,
}

impl SourceStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "healthy" => SourceStatus::Healthy,
            "warning" => SourceStatus::Warning,
            "error" => SourceStatus::Error,
            _ => SourceStatus::Unknown(raw.to_string()),
        }
    }

    /// Indicator class; unknown statuses resolve to [`StatusIndicator::Error`].
    pub fn indicator(&self) -> StatusIndicator {
        match self {
            SourceStatus::Healthy => StatusIndicator::Healthy,
            SourceStatus::Warning => StatusIndicator::Warning,
            SourceStatus::Error | SourceStatus::Unknown(_) => StatusIndicator::Error,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SourceStatus::Healthy => "healthy",
            SourceStatus::Warning => "warning",
            SourceStatus::Error => "error",
            SourceStatus::Unknown(raw) => raw,
        }
    }
}

impl StatusIndicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusIndicator::Healthy => "healthy",
            StatusIndicator::Warning => "warning",
            StatusIndicator::Error => "error",
        }
    }
}

/// One row of the collection status list.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSourceStatus {
    pub name: String,
    pub status: SourceStatus,
    pub record_count: u64,
    pub last_update: String,
}

impl CollectionSourceStatus {
    pub fn from_payload(payload: CollectionStatusPayload) -> Self {
        Self {
            name: payload.name,
            status: SourceStatus::parse(&payload.status),
            record_count: payload.records,
            last_update: payload.last_update,
        }
    }
}

/// Severity of an alert. Unrecognized values pass through in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Other(String),
}

impl AlertSeverity {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => AlertSeverity::Low,
            "medium" => AlertSeverity::Medium,
            "high" => AlertSeverity::High,
            _ => AlertSeverity::Other(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Other(raw) => raw,
        }
    }
}

/// A single alert as shown in the alerts panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: String,
}

impl Alert {
    pub fn from_payload(payload: AlertPayload) -> Self {
        Self {
            severity: AlertSeverity::parse(&payload.severity),
            message: payload.message,
            timestamp: payload.timestamp,
        }
    }
}
