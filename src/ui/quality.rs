//! Data quality bar chart.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{QualitySnapshot, QUALITY_DIMENSIONS};

/// Bar heights as whole percentages, in dimension order.
pub fn bar_values(quality: &QualitySnapshot) -> [u64; 6] {
    quality.series().map(|v| {
        if v.is_nan() {
            0
        } else {
            (v * 100.0).round().clamp(0.0, 100.0) as u64
        }
    })
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref quality) = app.state.quality else {
        let waiting = Paragraph::new(" Waiting for data...")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(
                Block::default()
                    .title(" Data Quality ")
                    .borders(Borders::ALL)
                    .border_type(app.theme.border_type)
                    .border_style(app.theme.panel_border(false)),
            );
        frame.render_widget(waiting, area);
        return;
    };

    let bars: Vec<Bar> = QUALITY_DIMENSIONS
        .iter()
        .zip(bar_values(quality))
        .map(|(label, value)| {
            Bar::default()
                .value(value)
                .text_value(format!("{}%", value))
                .label(Line::from(&label[..4]))
                .style(Style::default().fg(app.theme.highlight))
        })
        .collect();

    // Six bars with a one column gap, inside the borders
    let bar_width = (area.width.saturating_sub(2) / 6).saturating_sub(1).max(3);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(
                    " Data Quality (avg {:.1}%) ",
                    quality.average() * 100.0
                ))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(app.theme.panel_border(false)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(100);

    frame.render_widget(chart, area);
}
