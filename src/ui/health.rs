//! System health gauges.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{HealthSnapshot, Severity};

/// One gauge row of the health panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeRow {
    pub label: &'static str,
    pub value: f64,
    pub severity: Severity,
}

impl GaugeRow {
    /// Fill ratio for a 0-100 value. Out of range values are clamped and
    /// NaN draws as empty.
    pub fn ratio(&self) -> f64 {
        if self.value.is_nan() {
            return 0.0;
        }
        (self.value / 100.0).clamp(0.0, 1.0)
    }
}

/// Gauges for overall score, CPU, memory and disk.
pub fn gauge_rows(health: &HealthSnapshot) -> [GaugeRow; 4] {
    [
        GaugeRow {
            label: "Overall",
            value: health.overall_score,
            severity: health.status,
        },
        GaugeRow {
            label: "CPU",
            value: health.cpu.percent,
            severity: health.cpu.severity,
        },
        GaugeRow {
            label: "Memory",
            value: health.memory.percent,
            severity: health.memory.severity,
        },
        GaugeRow {
            label: "Disk",
            value: health.disk.percent,
            severity: health.disk.severity,
        },
    ]
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.state.health {
        Some(ref health) if !health.reported_status.is_empty() => {
            format!(" System Health ({}) ", health.reported_status)
        }
        _ => " System Health ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.panel_border(false));

    let Some(ref health) = app.state.health else {
        let waiting = Paragraph::new(" Waiting for data...")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(waiting, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(1); 4])
        .spacing(1)
        .split(inner);

    for (gauge_row, row) in gauge_rows(health).iter().zip(rows.iter()) {
        let [label_area, gauge_area] =
            Layout::horizontal([Constraint::Length(8), Constraint::Min(10)]).areas(*row);

        frame.render_widget(Paragraph::new(gauge_row.label), label_area);
        let gauge = Gauge::default()
            .gauge_style(app.theme.severity_style(gauge_row.severity))
            .ratio(gauge_row.ratio())
            .label(format!("{:.1}% {}", gauge_row.value, gauge_row.severity.symbol()));
        frame.render_widget(gauge, gauge_area);
    }
}
