//! Historical health tracking for sparklines and trends.

use std::collections::VecDeque;

use super::snapshot::HealthSnapshot;

/// Maximum number of historical samples to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// The health metrics that are tracked over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMetric {
    OverallScore,
    Cpu,
    Memory,
    Disk,
}

/// Tracks recent health samples for trending and sparklines.
///
/// Only successful health fetches are recorded, so a failing health
/// endpoint simply stops the sparkline from advancing.
#[derive(Debug, Clone, Default)]
pub struct History {
    pub overall: VecDeque<f64>,
    pub cpu: VecDeque<f64>,
    pub memory: VecDeque<f64>,
    pub disk: VecDeque<f64>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new health sample
    pub fn record(&mut self, health: &HealthSnapshot) {
        push_bounded(&mut self.overall, health.overall_score);
        push_bounded(&mut self.cpu, health.cpu.percent);
        push_bounded(&mut self.memory, health.memory.percent);
        push_bounded(&mut self.disk, health.disk.percent);
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.overall.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overall.is_empty()
    }

    fn values(&self, metric: HistoryMetric) -> &VecDeque<f64> {
        match metric {
            HistoryMetric::OverallScore => &self.overall,
            HistoryMetric::Cpu => &self.cpu,
            HistoryMetric::Memory => &self.memory,
            HistoryMetric::Disk => &self.disk,
        }
    }

    /// Get sparkline data for a metric (normalized to 0-7 for 8 bar levels).
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn sparkline(&self, metric: HistoryMetric) -> Vec<u8> {
        let values = self.values(metric);
        if values.len() < 2 {
            return Vec::new();
        }

        let finite = || values.iter().copied().filter(|v| v.is_finite());
        let min = finite().fold(f64::INFINITY, f64::min);
        let max = finite().fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            return Vec::new();
        }
        let range = (max - min).max(f64::EPSILON);

        values
            .iter()
            .map(|&v| {
                if !v.is_finite() {
                    return 0;
                }
                let normalized = ((v - min) / range * 7.0) as u8;
                normalized.min(7)
            })
            .collect()
    }

    /// Change between the two most recent samples.
    ///
    /// Returns None if there's not enough history to calculate a trend.
    pub fn trend(&self, metric: HistoryMetric) -> Option<f64> {
        let values = self.values(metric);
        if values.len() < 2 {
            return None;
        }
        let current = *values.back()?;
        let previous = *values.get(values.len() - 2)?;
        Some(current - previous)
    }
}

fn push_bounded(values: &mut VecDeque<f64>, value: f64) {
    values.push_back(value);
    if values.len() > MAX_HISTORY_SIZE {
        values.pop_front();
    }
}
