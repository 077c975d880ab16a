//! # collectwatch
//!
//! A terminal dashboard and library for watching a data collection pipeline.
//!
//! On a fixed interval the dashboard pulls four independent snapshots from a
//! backend (system health, data quality, per-source collection status and
//! active alerts), classifies the numbers into severity bands and redraws
//! the affected panels. A source that fails to fetch keeps showing its
//! previous values; the failure is logged and the next tick retries.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           Application                            │
//! │  ┌─────────┐  trigger  ┌───────────┐  spawn   ┌────────────────┐ │
//! │  │   app   │──────────▶│ scheduler │─────────▶│ refresh_cycle  │ │
//! │  │ (state) │◀──────────│Idle/Refr. │◀─────────│ join! ×4 fetch │ │
//! │  └────┬────┘  outcome  └───────────┘   mpsc   └───────┬────────┘ │
//! │       │ apply                                         │          │
//! │       ▼                                               ▼          │
//! │  ┌─────────┐    ┌─────────┐                      ┌─────────┐     │
//! │  │  data   │───▶│   ui    │                      │ source  │     │
//! │  └─────────┘    └─────────┘         HttpSource | FileSource |    │
//! │                                     SampleSource                 │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, panel focus and the refresh timer
//! - **[`scheduler`]**: The `Idle`/`Refreshing` state machine, overlap guard
//!   and [`refresh_cycle`]
//! - **[`source`]**: The [`DashboardSource`] trait with HTTP, file and
//!   sample implementations
//! - **[`data`]**: Severity classification, snapshots and [`DashboardState`]
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered configuration (file, environment, CLI)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a backend
//! collectwatch --url http://localhost:8000
//!
//! # Try it without a backend
//! collectwatch --sample
//!
//! # One refresh cycle, written as JSON
//! collectwatch --file dashboard.json --export state.json
//! ```
//!
//! ### Classifying values
//!
//! ```
//! use collectwatch::{classify_health, classify_usage, Severity};
//!
//! assert_eq!(classify_health(85.5), Severity::Nominal);
//! assert_eq!(classify_health(60.0), Severity::Warning);
//! assert_eq!(classify_usage(85.0), Severity::Critical);
//! ```
//!
//! ### Running a single refresh cycle
//!
//! ```
//! use collectwatch::{refresh_cycle, DashboardState, SampleSource, Thresholds, Trigger};
//!
//! # tokio_test::block_on(async {
//! let source = SampleSource::new();
//! let outcome = refresh_cycle(&source, Trigger::Manual).await;
//!
//! let mut state = DashboardState::new();
//! let summary = state.apply(outcome, &Thresholds::default());
//! assert!(summary.failed.is_empty());
//! assert_eq!(state.collection.len(), 3);
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, Panel};
pub use config::DashboardConfig;
pub use data::{
    classify_health, classify_usage, Alert, AlertSeverity, CollectionSourceStatus,
    DashboardState, HealthSnapshot, QualitySnapshot, Severity, SourceStatus, Thresholds,
};
pub use error::FetchError;
pub use scheduler::{
    refresh_cycle, run_cycle_task, CycleOutcome, OverlapPolicy, RefreshState, RefreshTimer,
    Scheduler, Trigger,
};
pub use source::{
    AlertPayload, CollectionStatusPayload, DashboardSource, EndpointPaths, FileSource,
    HealthPayload, HttpSource, QualityPayload, SampleSource, SourceKind,
};
