//! Active alerts panel.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Panel};
use crate::data::Alert;

/// Text shown in place of the list when there are no alerts.
pub const NO_ALERTS: &str = "No alerts";

/// What the alerts panel shows for a given list.
#[derive(Debug, PartialEq)]
pub enum AlertsDisplay<'a> {
    /// The single "No alerts" line.
    Placeholder,
    /// One entry per alert, in backend order.
    Entries(&'a [Alert]),
}

pub fn alerts_display(alerts: &[Alert]) -> AlertsDisplay<'_> {
    if alerts.is_empty() {
        AlertsDisplay::Placeholder
    } else {
        AlertsDisplay::Entries(alerts)
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Panel::Alerts;
    let alerts = &app.state.alerts;

    let block = Block::default()
        .title(format!(" Alerts ({}) ", alerts.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.panel_border(focused));

    let entries = match alerts_display(alerts) {
        AlertsDisplay::Placeholder => {
            let placeholder = Paragraph::new(format!(" {}", NO_ALERTS))
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }
        AlertsDisplay::Entries(entries) => entries,
    };

    let items: Vec<ListItem> = entries
        .iter()
        .map(|alert| {
            let style = app.theme.alert_style(&alert.severity);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<8}", format!("[{}]", alert.severity.label().to_uppercase())),
                    style,
                ),
                Span::raw(" "),
                Span::raw(alert.message.clone()),
                Span::raw("  "),
                Span::styled(
                    alert.timestamp.clone(),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(app.theme.selected)
        .highlight_symbol(if focused { "▶ " } else { "  " });

    let mut state = ListState::default();
    state.select(Some(app.selected_alert));
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AlertSeverity;
    use crate::ui::tests::{buffer_text, test_app};
    use ratatui::{backend::TestBackend, Terminal};

    fn alert(severity: &str, message: &str) -> Alert {
        Alert {
            severity: AlertSeverity::parse(severity),
            message: message.to_string(),
            timestamp: "2024-01-15 10:30:00".to_string(),
        }
    }

    #[test]
    fn test_empty_list_is_placeholder() {
        assert_eq!(alerts_display(&[]), AlertsDisplay::Placeholder);

        let alerts = vec![alert("high", "disk almost full")];
        assert_eq!(alerts_display(&alerts), AlertsDisplay::Entries(&alerts));
    }

    #[tokio::test]
    async fn test_render_placeholder() {
        let app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(50, 6)).unwrap();
        terminal.draw(|f| render(f, &app, f.area())).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains(NO_ALERTS));
        assert!(text.contains("Alerts (0)"));
    }

    #[tokio::test]
    async fn test_render_entries_replace_placeholder() {
        let mut app = test_app();
        app.state.alerts = vec![
            alert("high", "Collector stalled"),
            alert("urgent", "Unmapped severity"),
        ];
        let mut terminal = Terminal::new(TestBackend::new(80, 6)).unwrap();
        terminal.draw(|f| render(f, &app, f.area())).unwrap();

        let text = buffer_text(&terminal);
        assert!(!text.contains(NO_ALERTS));
        assert!(text.contains("[HIGH]"));
        assert!(text.contains("Collector stalled"));
        assert!(text.contains("[URGENT]"));
    }
}
