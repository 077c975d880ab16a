//! Common UI components shared across panels.
//!
//! This module contains the header bar, status bar, help overlay and the
//! "terminal too small" notice.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_duration;
use crate::data::{HistoryMetric, Severity};
use crate::scheduler::RefreshState;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Longest sparkline drawn in the header.
const HEADER_SPARKLINE_LEN: usize = 20;

/// Render sparkline levels (0-7) as block characters.
pub fn render_sparkline(levels: &[u8]) -> String {
    levels
        .iter()
        .map(|&l| SPARKLINE_CHARS[l.min(7) as usize])
        .collect()
}

/// Render the header bar with the pipeline health overview.
///
/// Displays: status indicator, overall score with its trend, resource
/// usage, source and alert counts.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref health) = app.state.health else {
        let line = Line::from(vec![
            Span::styled(
                " COLLECTWATCH ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    // Worst band across all health gauges
    let worst = health
        .bands()
        .into_iter()
        .max()
        .unwrap_or(Severity::Nominal);

    let history = &app.state.history;
    let levels = history.sparkline(HistoryMetric::OverallScore);
    let skip = levels.len().saturating_sub(HEADER_SPARKLINE_LEN);
    let sparkline = render_sparkline(&levels[skip..]);

    let trend = match history.trend(HistoryMetric::OverallScore) {
        Some(t) if t > 0.0 => format!(" ↑{:.1}", t),
        Some(t) if t < 0.0 => format!(" ↓{:.1}", t.abs()),
        _ => String::new(),
    };

    let mut spans = vec![
        Span::styled(" ● ", app.theme.severity_style(worst)),
        Span::styled("COLLECTWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ Health "),
        Span::styled(
            format!("{:.1}", health.overall_score),
            app.theme.severity_style(health.status),
        ),
        Span::raw(format!(" ({})", health.status.as_str())),
    ];
    if !sparkline.is_empty() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(sparkline, Style::default().fg(app.theme.highlight)));
    }
    spans.push(Span::raw(trend));
    spans.push(Span::raw(" │ "));

    for (label, metric) in [
        ("CPU", &health.cpu),
        ("MEM", &health.memory),
        ("DSK", &health.disk),
    ] {
        spans.push(Span::raw(format!("{} ", label)));
        spans.push(Span::styled(
            format!("{:.0}%", metric.percent),
            app.theme.severity_style(metric.severity),
        ));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::raw(format!(
        "│ {} sources │ {} alerts",
        app.state.collection.len(),
        app.state.alerts.len()
    )));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last update, refresh state, available controls.
/// Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let refresh = match app.refresh_state() {
        RefreshState::Refreshing => "Refreshing...".to_string(),
        RefreshState::Idle => match app.time_until_refresh() {
            Some(left) => format!("Idle, next in {}", format_duration(left)),
            None => "Idle".to_string(),
        },
    };

    let status = if let Some(updated) = app.state.last_updated() {
        format!(
            " {} | Updated {:.1}s ago | {} | every {} | r:refresh Tab:focus ?:help q:quit",
            app.source_description(),
            updated.elapsed().as_secs_f64(),
            refresh,
            format_duration(app.refresh_interval()),
        )
    } else {
        format!(" {} | {} | q:quit", app.source_description(), refresh)
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab/S-Tab   Switch panel"),
        Line::from("  ↑/↓ j/k     Scroll panel"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r           Refresh now"),
        Line::from("  e           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 18u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Shown instead of the dashboard when the terminal is below the minimum size.
pub fn render_too_small(frame: &mut Frame, area: Rect, min_width: u16, min_height: u16) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
        area.width, area.height, min_width, min_height
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(ratatui::style::Color::Yellow));
    let height = 5.min(area.height);
    let centered = Rect::new(
        area.x,
        area.y + (area.height.saturating_sub(height)) / 2,
        area.width,
        height,
    );
    frame.render_widget(paragraph, centered);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HealthSnapshot, Thresholds};
    use crate::source::sample;
    use crate::ui::tests::{buffer_text, test_app};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_render_sparkline() {
        assert_eq!(render_sparkline(&[0, 3, 7, 9]), "▁▄██");
        assert_eq!(render_sparkline(&[]), "");
    }

    #[tokio::test]
    async fn test_header_loading_then_scores() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(120, 1)).unwrap();

        terminal.draw(|f| render_header(f, &app, f.area())).unwrap();
        assert!(buffer_text(&terminal).contains("Loading..."));

        let thresholds = Thresholds::default();
        let first = HealthSnapshot::from_payload(sample::health(), &thresholds);
        let mut payload = sample::health();
        payload.overall_score = 72.0;
        let second = HealthSnapshot::from_payload(payload, &thresholds);
        app.state.history.record(&first);
        app.state.history.record(&second);
        app.state.health = Some(second);

        terminal.draw(|f| render_header(f, &app, f.area())).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Health 72.0 (warning)"));
        assert!(text.contains("↓13.5"));
        assert!(text.contains("CPU 45%"));
    }

    #[tokio::test]
    async fn test_status_bar_before_first_update() {
        let app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|f| render_status_bar(f, &app, f.area())).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("sample data"));
        assert!(text.contains("Idle"));
    }

    #[tokio::test]
    async fn test_status_message_takes_precedence() {
        let mut app = test_app();
        app.set_status_message("Exported to dashboard_export.json".to_string());
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|f| render_status_bar(f, &app, f.area())).unwrap();

        assert!(buffer_text(&terminal).contains("Exported to dashboard_export.json"));
    }
}
