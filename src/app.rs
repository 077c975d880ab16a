//! Application state and navigation logic.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::data::{DashboardState, Thresholds};
use crate::scheduler::{
    RefreshState, RefreshTimer, Scheduler, SchedulerStats, Trigger, TriggerResult,
};
use crate::ui::Theme;

/// The scrollable panel that currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Collection source status table.
    Collection,
    /// Active alerts list.
    Alerts,
}

impl Panel {
    /// Cycle to the next panel.
    pub fn next(self) -> Self {
        match self {
            Panel::Collection => Panel::Alerts,
            Panel::Alerts => Panel::Collection,
        }
    }

    /// Returns the display label for this panel.
    pub fn label(&self) -> &'static str {
        match self {
            Panel::Collection => "Collection",
            Panel::Alerts => "Alerts",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub focus: Panel,

    // Dashboard data
    pub state: DashboardState,
    pub thresholds: Thresholds,
    scheduler: Scheduler,
    timer: RefreshTimer,
    initialized: bool,

    // Navigation state
    pub selected_collection: usize,
    pub selected_alert: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App refreshing through `scheduler` every `refresh_interval`.
    pub fn new(
        scheduler: Scheduler,
        thresholds: Thresholds,
        refresh_interval: Duration,
        theme: Theme,
    ) -> Self {
        Self {
            running: true,
            show_help: false,
            focus: Panel::Collection,
            state: DashboardState::new(),
            thresholds,
            scheduler,
            timer: RefreshTimer::new(refresh_interval),
            initialized: false,
            selected_collection: 0,
            selected_alert: 0,
            theme,
            status_message: None,
        }
    }

    /// Reset widgets to their empty state, start the first cycle and arm
    /// the refresh timer. Only the first call has any effect.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.state = DashboardState::new();
        self.scheduler.trigger(Trigger::Initial);
        self.timer.arm(Instant::now());
    }

    /// Apply finished cycles and fire the timer if it is due.
    ///
    /// Returns true if any cycle was applied.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut applied = false;
        while let Some(outcome) = self.scheduler.try_complete() {
            self.state.apply(outcome, &self.thresholds);
            applied = true;
        }
        if applied {
            self.clamp_selection();
        }

        if self.timer.poll_due(now) {
            self.scheduler.trigger(Trigger::Timer);
        }
        applied
    }

    /// Start a cycle now, subject to the overlap guard.
    pub fn refresh_now(&mut self) {
        let message = match self.scheduler.trigger(Trigger::Manual) {
            TriggerResult::Started => "Refreshing...",
            TriggerResult::Skipped => "Refresh already in progress",
            TriggerResult::Queued => "Refresh queued",
        };
        self.set_status_message(message.to_string());
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.scheduler.state()
    }

    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    pub fn refresh_interval(&self) -> Duration {
        self.timer.interval()
    }

    /// Time left until the next timer-driven cycle.
    pub fn time_until_refresh(&self) -> Option<Duration> {
        self.timer.time_until_due(Instant::now())
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.scheduler.source_description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Move focus to the other panel.
    pub fn next_panel(&mut self) {
        self.focus = self.focus.next();
    }

    /// Focus a specific panel.
    pub fn set_focus(&mut self, panel: Panel) {
        self.focus = panel;
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            Panel::Collection => self.state.collection.len(),
            Panel::Alerts => self.state.alerts.len(),
        }
    }

    fn focused_selection(&mut self) -> &mut usize {
        match self.focus {
            Panel::Collection => &mut self.selected_collection,
            Panel::Alerts => &mut self.selected_alert,
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.focused_len().saturating_sub(1);
        let selected = self.focused_selection();
        *selected = (*selected + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        let selected = self.focused_selection();
        *selected = selected.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        *self.focused_selection() = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.focused_len().saturating_sub(1);
        *self.focused_selection() = last;
    }

    // Lists are replaced wholesale, so selections may point past the end
    fn clamp_selection(&mut self) {
        self.selected_collection = self
            .selected_collection
            .min(self.state.collection.len().saturating_sub(1));
        self.selected_alert = self
            .selected_alert
            .min(self.state.alerts.len().saturating_sub(1));
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        if self.state.last_updated().is_none() {
            anyhow::bail!("No data to export");
        }
        self.state.write_export(path)
    }
}
