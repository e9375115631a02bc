mod editor;
mod progress_bar;
mod prompter;
mod status_bar;

use ratatui::Frame;

use crate::app::App;

pub use editor::EditorWidget;
pub use progress_bar::{format_time, ProgressBarWidget};
pub use prompter::PrompterWidget;
pub use status_bar::StatusBarWidget;

/// Lay out and draw one frame
pub fn draw(frame: &mut Frame, app: &mut App) {
    let layout = app.layout(frame.area());

    PrompterWidget::render(frame, layout.prompter, app);
    if let Some(editor) = layout.editor {
        EditorWidget::render(frame, editor, app);
    }
    ProgressBarWidget::render(frame, layout.progress, app);
    StatusBarWidget::render(frame, layout.status, app);
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use prompter_core::{AppConfig, Clock, ManualClock};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use super::*;
    use crate::input::Action;

    fn screen(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn app(clock: &ManualClock) -> App {
        let clock: Rc<dyn Clock> = Rc::new(clock.clone());
        let text = (0..60)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        App::new(AppConfig::default(), text, clock)
    }

    #[test]
    fn test_draw_full_frame() {
        let clock = ManualClock::new();
        let mut app = app(&clock);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        let text = screen(terminal.backend().buffer());

        assert!(text.contains("Prompter"));
        assert!(text.contains("Script"));
        assert!(text.contains("line 0"));
        assert!(text.contains("PAUSED"));
        assert!(text.contains("00:00 / 01:00"));
        assert!(app.engine.is_mounted());
    }

    #[test]
    fn test_draw_follows_playback() {
        let clock = ManualClock::new();
        let mut app = app(&clock);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();

        app.handle_action(Action::TogglePlayback);
        clock.advance(Duration::from_secs(15));
        app.tick();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();

        let text = screen(terminal.backend().buffer());
        assert!(text.contains("PLAYING"));
        assert!(text.contains("00:15 / 01:00"));
    }

    #[test]
    fn test_draw_without_editor() {
        let clock = ManualClock::new();
        let mut app = app(&clock);
        app.handle_action(Action::ToggleEditor);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        let text = screen(terminal.backend().buffer());
        assert!(text.contains("Prompter"));
        assert!(!text.contains("Script"));
    }
}
