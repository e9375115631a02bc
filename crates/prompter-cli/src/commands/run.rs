use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use prompter_core::{
    content::{load_content, SAMPLE_TEXT},
    AppConfig, Clock, MonotonicClock,
};
use prompter_tui::{
    event::{AppEvent, EventHandler},
    widgets, App,
};

pub async fn run(config: AppConfig, file: Option<PathBuf>) -> Result<()> {
    let text = match file {
        Some(path) => load_content(&path).await?,
        None => SAMPLE_TEXT.to_string(),
    };
    info!(chars = text.len(), "Starting prompter");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        SetTitle("Prompter")
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.animation_fps);

    let clock: Rc<dyn Clock> = Rc::new(MonotonicClock::new());
    let mut app = App::new(config, text, clock);

    let result = event_loop(&mut terminal, &mut app, &event_handler);

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| widgets::draw(frame, app))?;

        if let Some(title) = app.media.session_mut().take_pending_title() {
            execute!(terminal.backend_mut(), SetTitle(title))?;
        }

        let timeout = event_handler.timeout(app.is_playing(), app.next_deadline());
        if let Some(event) = event_handler.next(timeout)? {
            match event {
                AppEvent::Key(key) => app.handle_key(key),
                AppEvent::Mouse(mouse) => app.handle_mouse(mouse),
                AppEvent::Resize(width, height) => {
                    // the next draw picks up the new size
                    debug!(width, height, "Terminal resized");
                }
                AppEvent::FocusLost => app.focus_lost(),
                AppEvent::Tick => {}
            }
        }

        app.tick();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
