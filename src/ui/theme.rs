//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{AlertSeverity, Severity, StatusIndicator};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level severity.
    pub warning: Color,
    /// Color for critical-level severity.
    pub critical: Color,
    /// Color for nominal severity.
    pub healthy: Color,
    /// Color for values without a known severity.
    pub neutral: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            neutral: Color::Gray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            neutral: Color::DarkGray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a severity band
    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Nominal => Style::default().fg(self.healthy),
            Severity::Warning => Style::default().fg(self.warning),
            Severity::Critical => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    /// Get style for a collection status indicator
    pub fn indicator_style(&self, indicator: StatusIndicator) -> Style {
        match indicator {
            StatusIndicator::Healthy => Style::default().fg(self.healthy),
            StatusIndicator::Warning => Style::default().fg(self.warning),
            StatusIndicator::Error => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    /// Get style for an alert severity
    pub fn alert_style(&self, severity: &AlertSeverity) -> Style {
        match severity {
            AlertSeverity::Low => Style::default().fg(self.highlight),
            AlertSeverity::Medium => Style::default().fg(self.warning),
            AlertSeverity::High => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
            AlertSeverity::Other(_) => Style::default().fg(self.neutral),
        }
    }

    /// Border style, highlighted when the panel has focus.
    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.highlight)
        } else {
            Style::default().fg(self.border)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_styles_share_color_and_weight() {
        let theme = Theme::dark();
        let critical = Style::default().fg(theme.critical).add_modifier(Modifier::BOLD);

        assert_eq!(theme.severity_style(Severity::Critical), critical);
        assert_eq!(theme.indicator_style(StatusIndicator::Error), critical);
        assert_eq!(theme.alert_style(&AlertSeverity::High), critical);
    }

    #[test]
    fn test_unknown_alert_severity_is_neutral() {
        let theme = Theme::light();
        let style = theme.alert_style(&AlertSeverity::Other("page".to_string()));
        assert_eq!(style, Style::default().fg(theme.neutral));
        assert!(!style.add_modifier.contains(Modifier::BOLD));
    }
}
