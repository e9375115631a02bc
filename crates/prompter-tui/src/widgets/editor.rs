use ratatui::{
    layout::{Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::app::App;

/// Script pane. Shows a scrollbar only while paused, when scrolling it
/// moves the prompter.
pub struct EditorWidget;

impl EditorWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let paused = !app.is_playing();

        let border_style = if paused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.grey0)
        };

        let block = Block::default()
            .title(app.locale.strings().editor_title)
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));

        frame.render_widget(block, area);

        let Some(view) = app.engine.view() else {
            return;
        };
        let Some(text_area) = app.layout.and_then(|l| l.editor_text()) else {
            return;
        };

        let lines: Vec<Line> = view
            .lines()
            .iter()
            .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(theme.fg0))))
            .collect();
        let paragraph = Paragraph::new(lines).scroll((view.top(), 0));
        frame.render_widget(paragraph, text_area);

        if paused {
            let mut state = ScrollbarState::new(view.max_top() as usize)
                .position(view.top() as usize)
                .viewport_content_length(view.height() as usize);
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(theme.grey1));
            frame.render_stateful_widget(scrollbar, area.inner(Margin::new(0, 1)), &mut state);
        }
    }
}
