//! Dashboard UI state and how refresh outcomes are merged into it.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use super::history::History;
use super::severity::Thresholds;
use super::snapshot::{Alert, CollectionSourceStatus, HealthSnapshot, QualitySnapshot};
use crate::error::FetchError;
use crate::scheduler::CycleOutcome;
use crate::source::SourceKind;

/// Everything the widgets draw from.
///
/// Owned by the application and only mutated by [`DashboardState::apply`].
/// A source that fails to fetch leaves its part of the state untouched.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub health: Option<HealthSnapshot>,
    pub quality: Option<QualitySnapshot>,
    pub collection: Vec<CollectionSourceStatus>,
    pub alerts: Vec<Alert>,
    pub history: History,
    /// When each source last delivered data.
    pub updated_at: HashMap<SourceKind, Instant>,
    pub cycles_applied: u64,
    pub fetch_failures: u64,
}

/// Which sources were updated and which failed in one applied cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub updated: Vec<SourceKind>,
    pub failed: Vec<SourceKind>,
}

impl DashboardState {
    /// Empty state: no snapshots, empty lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the results of one refresh cycle.
    ///
    /// Each source is applied independently: successes replace that
    /// source's values wholesale, failures are logged and skipped.
    pub fn apply(&mut self, outcome: CycleOutcome, thresholds: &Thresholds) -> ApplySummary {
        let mut summary = ApplySummary::default();
        let now = Instant::now();

        let CycleOutcome {
            trigger,
            health,
            quality,
            collection_status,
            alerts,
            elapsed,
        } = outcome;

        if let Some(payload) = self.settle(SourceKind::Health, health, &mut summary) {
            let snapshot = HealthSnapshot::from_payload(payload, thresholds);
            self.history.record(&snapshot);
            self.health = Some(snapshot);
            self.updated_at.insert(SourceKind::Health, now);
        }

        if let Some(payload) = self.settle(SourceKind::Quality, quality, &mut summary) {
            self.quality = Some(QualitySnapshot::from_payload(payload));
            self.updated_at.insert(SourceKind::Quality, now);
        }

        if let Some(list) =
            self.settle(SourceKind::CollectionStatus, collection_status, &mut summary)
        {
            self.collection = list
                .into_iter()
                .map(CollectionSourceStatus::from_payload)
                .collect();
            self.updated_at.insert(SourceKind::CollectionStatus, now);
        }

        if let Some(list) = self.settle(SourceKind::Alerts, alerts, &mut summary) {
            self.alerts = list.into_iter().map(Alert::from_payload).collect();
            self.updated_at.insert(SourceKind::Alerts, now);
        }

        self.cycles_applied += 1;
        info!(
            trigger = ?trigger,
            elapsed_ms = elapsed.as_millis() as u64,
            updated = summary.updated.len(),
            failed = summary.failed.len(),
            "refresh cycle applied"
        );

        summary
    }

    fn settle<T>(
        &mut self,
        kind: SourceKind,
        result: Result<T, FetchError>,
        summary: &mut ApplySummary,
    ) -> Option<T> {
        match result {
            Ok(value) => {
                summary.updated.push(kind);
                Some(value)
            }
            Err(e) => {
                self.fetch_failures += 1;
                summary.failed.push(kind);
                warn!(source = kind.name(), error = %e, "fetch failed, keeping previous values");
                None
            }
        }
    }

    /// Most recent successful update across all sources.
    pub fn last_updated(&self) -> Option<Instant> {
        self.updated_at.values().max().copied()
    }

    /// Build the JSON export document for the current state.
    pub fn export_json(&self) -> serde_json::Value {
        let health = self.health.as_ref().map(|h| {
            serde_json::json!({
                "overall_score": h.overall_score,
                "status": h.status.as_str(),
                "reported_status": h.reported_status,
                "system": {
                    "cpu_percent": h.cpu.percent,
                    "cpu_status": h.cpu.severity.as_str(),
                    "memory_percent": h.memory.percent,
                    "memory_status": h.memory.severity.as_str(),
                    "disk_percent": h.disk.percent,
                    "disk_status": h.disk.severity.as_str(),
                }
            })
        });

        let quality = self.quality.as_ref().map(|q| {
            serde_json::json!({
                "completeness": q.completeness,
                "consistency": q.consistency,
                "accuracy": q.accuracy,
                "timeliness": q.timeliness,
                "validity": q.validity,
                "uniqueness": q.uniqueness,
                "average": q.average(),
            })
        });

        let collection: Vec<serde_json::Value> = self
            .collection
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name,
                    "status": c.status.label(),
                    "indicator": c.status.indicator().as_str(),
                    "records": c.record_count,
                    "last_update": c.last_update,
                })
            })
            .collect();

        let alerts: Vec<serde_json::Value> = self
            .alerts
            .iter()
            .map(|a| {
                serde_json::json!({
                    "severity": a.severity.label(),
                    "message": a.message,
                    "timestamp": a.timestamp,
                })
            })
            .collect();

        serde_json::json!({
            "health": health,
            "quality": quality,
            "collection_status": collection,
            "alerts": alerts,
        })
    }

    /// Write the export document to a file as pretty JSON.
    pub fn write_export(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.export_json())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
