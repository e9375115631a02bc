use prompter_core::config::TimingMode;
use prompter_core::media::PlaybackState;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::widgets::progress_bar::format_time;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let strings = app.locale.strings();

        let (state_str, state_color) = if app.engine.is_finished() && !app.is_playing() {
            (strings.finished, theme.finished)
        } else if app.is_playing() {
            (strings.playing, theme.playing)
        } else {
            (strings.paused, theme.paused)
        };

        let indicator = match app.media.session().state() {
            PlaybackState::Playing => "▶",
            PlaybackState::Paused => "⏸",
            PlaybackState::None => " ",
        };

        let timing = match app.engine.timing() {
            TimingMode::Fixed { duration_ms } => format!(
                "{}: {}",
                strings.duration,
                format_time(std::time::Duration::from_millis(duration_ms))
            ),
            TimingMode::Speed { lines_per_second } => {
                format!("{}: {:.2} lps", strings.speed, lines_per_second)
            }
        };

        let state_text = format!(" {} {} ", indicator, state_str);
        let status_text = match &app.status_message {
            Some(msg) => format!("| {} | {} | {} ", timing, app.locale.current().label(), msg),
            None => format!("| {} | {} ", timing, app.locale.current().label()),
        };

        let help_hint = strings.help_hint;
        let used = state_text.width() + status_text.width() + help_hint.width();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                state_text,
                Style::default().fg(theme.bg0).bg(state_color),
            ),
            Span::styled(
                status_text,
                Style::default().fg(theme.fg0).bg(theme.bg2),
            ),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(
                help_hint,
                Style::default().fg(theme.grey2).bg(theme.bg2),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
