use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::{App, Panel};
use crate::ui;

/// Where the `e` key writes the current dashboard state.
pub const EXPORT_PATH: &str = "dashboard_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Panel focus
        KeyCode::Tab | KeyCode::BackTab => app.next_panel(),

        // Scroll the focused panel
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Char('r') => app.refresh_now(),

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => export(app, Path::new(EXPORT_PATH)),

        _ => {}
    }
}

fn export(app: &mut App, path: &Path) {
    match app.export_state(path) {
        Ok(()) => {
            app.set_status_message(format!("Exported to {}", path.display()));
        }
        Err(e) => {
            app.set_status_message(format!("Export failed: {}", e));
        }
    }
}

/// Handle mouse events. `area` is the full terminal area the dashboard
/// was drawn into.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, area: Rect) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click in the lower half focuses that panel and selects the row
        MouseEventKind::Down(MouseButton::Left) => {
            let rows_start = ui::collection_rows_start(area.height);
            // The alerts list has no header row
            let panel_top = rows_start - 2;
            if mouse.row <= panel_top || mouse.row + 1 >= area.height {
                return;
            }

            if mouse.column < area.width / 2 {
                app.set_focus(Panel::Collection);
                if mouse.row >= rows_start {
                    let item = (mouse.row - rows_start) as usize;
                    if item < app.state.collection.len() {
                        app.selected_collection = item;
                    }
                }
            } else {
                app.set_focus(Panel::Alerts);
                let item = (mouse.row - panel_top - 1) as usize;
                if item < app.state.alerts.len() {
                    app.selected_alert = item;
                }
            }
        }

        _ => {}
    }
}
