//! Severity bands and the thresholds that produce them.
//!
//! Every numeric metric on the dashboard is reduced to one of three bands
//! before it is drawn. The classification functions are total: any `f64`,
//! including values outside `0..=100` and NaN, lands in exactly one band.

use serde::Deserialize;

/// Coarse three-level classification of a numeric metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Nominal,
    Warning,
    Critical,
}

impl Severity {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Nominal => "OK",
            Severity::Warning => "WARN",
            Severity::Critical => "CRIT",
        }
    }

    /// Lowercase name, used in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Nominal => "nominal",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

/// Thresholds for severity classification.
///
/// Health scores are "higher is better" (bands close from above), resource
/// usage is "lower is better" (bands open from below). Lower bounds are
/// inclusive in both cases.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Scores at or above this are nominal.
    pub health_nominal: f64,
    /// Scores at or above this (and below `health_nominal`) are a warning.
    pub health_warning: f64,
    /// Usage at or above this percentage is a warning.
    pub usage_warning: f64,
    /// Usage at or above this percentage is critical.
    pub usage_critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            health_nominal: 80.0,
            health_warning: 60.0,
            usage_warning: 70.0,
            usage_critical: 85.0,
        }
    }
}

impl Thresholds {
    /// Classify an overall health score.
    ///
    /// NaN fails both comparisons and is therefore critical.
    pub fn classify_health(&self, score: f64) -> Severity {
        if score >= self.health_nominal {
            Severity::Nominal
        } else if score >= self.health_warning {
            Severity::Warning
        } else {
            Severity::Critical
        }
    }

    /// Classify a resource usage percentage (cpu, memory, disk).
    ///
    /// NaN fails both comparisons and is therefore critical.
    pub fn classify_usage(&self, percent: f64) -> Severity {
        if percent < self.usage_warning {
            Severity::Nominal
        } else if percent < self.usage_critical {
            Severity::Warning
        } else {
            Severity::Critical
        }
    }

    /// Check that the bands are well-formed.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.health_warning.is_finite() && self.health_nominal.is_finite(),
            "health thresholds must be finite"
        );
        anyhow::ensure!(
            self.health_warning <= self.health_nominal,
            "health_warning ({}) must not exceed health_nominal ({})",
            self.health_warning,
            self.health_nominal
        );
        anyhow::ensure!(
            self.usage_warning.is_finite() && self.usage_critical.is_finite(),
            "usage thresholds must be finite"
        );
        anyhow::ensure!(
            self.usage_warning <= self.usage_critical,
            "usage_warning ({}) must not exceed usage_critical ({})",
            self.usage_warning,
            self.usage_critical
        );
        Ok(())
    }
}

/// Classify a health score with the default thresholds (80 / 60).
pub fn classify_health(score: f64) -> Severity {
    Thresholds::default().classify_health(score)
}

/// Classify a usage percentage with the default thresholds (70 / 85).
pub fn classify_usage(percent: f64) -> Severity {
    Thresholds::default().classify_usage(percent)
}
