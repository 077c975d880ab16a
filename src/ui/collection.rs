//! Collection source status table.
//!
//! One row per source, in backend order. An empty list renders the header
//! row only.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Panel};
use crate::data::StatusIndicator;

/// Symbol drawn in front of a source for each indicator class.
pub fn indicator_symbol(indicator: StatusIndicator) -> &'static str {
    match indicator {
        StatusIndicator::Healthy => "●",
        StatusIndicator::Warning => "▲",
        StatusIndicator::Error => "✖",
    }
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Panel::Collection;
    let sources = &app.state.collection;

    let header = Row::new(vec!["", "Source", "Status", "Records", "Last update"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = sources
        .iter()
        .map(|source| {
            let indicator = source.status.indicator();
            let style = app.theme.indicator_style(indicator);
            Row::new(vec![
                Cell::from(Span::styled(indicator_symbol(indicator), style)),
                Cell::from(source.name.clone()),
                Cell::from(Span::styled(source.status.label().to_string(), style)),
                Cell::from(format_count(source.record_count)),
                Cell::from(Span::styled(
                    source.last_update.clone(),
                    Style::default().add_modifier(Modifier::DIM),
                )),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Min(16),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Collection Status ({}) ", sources.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(app.theme.panel_border(focused)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol(if focused { "▶ " } else { "  " });

    let mut state = TableState::default();
    if !sources.is_empty() {
        state.select(Some(app.selected_collection));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
