//! Data models and processing for dashboard sources.
//!
//! This module turns raw endpoint payloads into severity-annotated
//! snapshots and holds the state the widgets draw from.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "30s", "500ms")
//! - [`severity`]: Severity bands and the [`Thresholds`] that produce them
//! - [`snapshot`]: Display-ready snapshots ([`HealthSnapshot`], [`QualitySnapshot`], ...)
//! - [`history`]: Recent health samples for sparklines
//! - [`state`]: [`DashboardState`], the merge target of each refresh cycle
//!
//! ## Data Flow
//!
//! ```text
//! CycleOutcome (four independent Results)
//!        │
//!        ▼
//! DashboardState::apply()
//!        │
//!        ├──▶ Ok  → *Snapshot::from_payload() replaces that source's values
//!        │
//!        └──▶ Err → logged, previous values kept
//! ```

pub mod duration;
pub mod history;
pub mod severity;
pub mod snapshot;
pub mod state;

pub use history::{History, HistoryMetric};
pub use severity::{classify_health, classify_usage, Severity, Thresholds};
pub use snapshot::{
    Alert, AlertSeverity, CollectionSourceStatus, HealthSnapshot, QualitySnapshot, SourceStatus,
    StatusIndicator, UsageMetric, QUALITY_DIMENSIONS,
};
pub use state::{ApplySummary, DashboardState};
