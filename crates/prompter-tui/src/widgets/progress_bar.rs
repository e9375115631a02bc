use std::time::Duration;

use ratatui::{layout::Rect, style::Style, widgets::Gauge, Frame};

use crate::app::App;

/// Playback position. Drag on it to scrub.
pub struct ProgressBarWidget;

impl ProgressBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let (elapsed, total) = app.times();

        let ratio = if total.is_zero() {
            app.engine.progress()
        } else {
            elapsed.as_secs_f64() / total.as_secs_f64()
        };

        let label = format!("{} / {}", format_time(elapsed), format_time(total));
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme.accent).bg(theme.bg1))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(label);

        frame.render_widget(gauge, area);
    }
}

/// "mm:ss", or "h:mm:ss" from an hour up
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Duration::ZERO), "00:00");
        assert_eq!(format_time(Duration::from_millis(83_900)), "01:23");
        assert_eq!(format_time(Duration::from_secs(3_725)), "1:02:05");
    }
}
