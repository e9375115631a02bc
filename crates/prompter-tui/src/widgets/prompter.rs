use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::theme::Theme;

/// The moving passage. Line `i` sits at row `offset + i` of the pane,
/// where `offset` is the animation's vertical translation.
pub struct PrompterWidget;

impl PrompterWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let border_style = if app.is_playing() {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.grey0)
        };

        let block = Block::default()
            .title(app.locale.strings().prompter_title)
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = Self::visible_lines(&app.prompter_lines, inner.height, app.prompter_offset(), theme);
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Rows of the pane. The centre row is the reading line; rows above it
    /// have been read and are dimmed.
    pub fn visible_lines<'a>(
        lines: &'a [String],
        height: u16,
        offset: i64,
        theme: &Theme,
    ) -> Vec<Line<'a>> {
        let centre = (height / 2) as i64;

        (0..height as i64)
            .map(|row| {
                let text = usize::try_from(row - offset)
                    .ok()
                    .and_then(|idx| lines.get(idx))
                    .map(String::as_str)
                    .unwrap_or("");

                if row == centre {
                    let style = Style::default()
                        .fg(theme.fg1)
                        .bg(theme.reading_line)
                        .add_modifier(Modifier::BOLD);
                    Line::from(Span::styled(text, style)).style(Style::default().bg(theme.reading_line))
                } else if row < centre {
                    Line::from(Span::styled(text, Style::default().fg(theme.grey1)))
                } else {
                    Line::from(Span::styled(text, Style::default().fg(theme.fg0)))
                }
            })
            .collect()
    }
}
