//! Terminal rendering using ratatui.
//!
//! Every panel draws straight from [`App::state`]; nothing here mutates it.
//!
//! ```text
//! ┌ header ─────────────────────────────────────────┐
//! ├ System Health ─────────┬ Data Quality ──────────┤
//! ├ Collection Status ─────┴ Alerts ────────────────┤
//! └ status bar ─────────────────────────────────────┘
//! ```

pub mod alerts;
pub mod collection;
pub mod common;
pub mod health;
pub mod quality;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::app::App;

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 16;

/// Terminal row where the collection table's first data row starts
/// (header bar, top panels, border, table header).
pub fn collection_rows_start(area_height: u16) -> u16 {
    let [_, top, _, _] = main_rows(area_height);
    1 + top + 2
}

fn main_rows(height: u16) -> [u16; 4] {
    let content = height.saturating_sub(2);
    let top = (content / 2).max(11).min(content);
    [1, top, content - top, 1]
}

/// Draw the whole dashboard.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        common::render_too_small(frame, area, MIN_WIDTH, MIN_HEIGHT);
        return;
    }

    let [header, top, bottom, status] = main_rows(area.height);
    let chunks = Layout::vertical([
        Constraint::Length(header), // Header bar
        Constraint::Length(top),    // Health + quality
        Constraint::Length(bottom), // Collection + alerts
        Constraint::Length(status), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);

    let [health_area, quality_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(chunks[1]);
    health::render(frame, app, health_area);
    quality::render(frame, app, quality_area);

    let [collection_area, alerts_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(chunks[2]);
    collection::render(frame, app, collection_area);
    alerts::render(frame, app, alerts_area);

    common::render_status_bar(frame, app, chunks[3]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}
